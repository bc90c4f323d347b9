//! Property tests over chains of arbitrary depth

use errwrap::{append_into, is, is_exact, new, new_error, wrap, wrapper, Cause, ChainLevel};
use proptest::prelude::*;

/// Builds `L0 = new_error(c0); Li = wrap(L(i-1), ci)` and returns every level.
fn build_chain(causes: &[Cause]) -> Vec<ChainLevel> {
    let mut levels = Vec::with_capacity(causes.len());
    let mut current = new_error([causes[0].clone()]).unwrap();
    levels.push(current.clone());
    for cause in &causes[1..] {
        current = wrap(current, [cause.clone()]).unwrap();
        levels.push(current.clone());
    }
    levels
}

fn causes(depth: usize) -> Vec<Cause> {
    (0..=depth).map(|i| new(format!("level {i}"))).collect()
}

proptest! {
    #[test]
    fn root_identity_holds_at_every_level(depth in 1usize..24) {
        let levels = build_chain(&causes(depth));
        let root = &levels[0];
        prop_assert!(root.root_cause().is_none());
        for level in &levels[1..] {
            let found = level.root_cause().unwrap();
            prop_assert!(found.ptr_eq(root));
        }
    }

    #[test]
    fn every_ancestor_cause_is_reachable(depth in 0usize..24) {
        let causes = causes(depth);
        let levels = build_chain(&causes);
        let top = levels.last().unwrap();
        for cause in &causes {
            prop_assert!(is(top, cause));
        }
        prop_assert!(!is(top, &new("level 0")));
    }

    #[test]
    fn exactness_only_at_introducing_level(depth in 0usize..24) {
        let causes = causes(depth);
        let levels = build_chain(&causes);
        let top = levels.last().unwrap();
        for (i, cause) in causes.iter().enumerate() {
            prop_assert_eq!(is_exact(top, cause), i == depth);
        }
    }

    #[test]
    fn wrapper_recovers_depth(depth in 0usize..24, pick in any::<prop::sample::Index>()) {
        let causes = causes(depth);
        let levels = build_chain(&causes);
        let top = levels.last().unwrap();
        let i = pick.index(causes.len());

        let found = wrapper(top, &causes[i]).unwrap();
        prop_assert!(found.current_causes().contains(&causes[i]));
        prop_assert_eq!(found.depth(), i);
        prop_assert!(found.ptr_eq(&levels[i]));
    }

    #[test]
    fn wrapped_is_not_reachable_from_wrappee(depth in 1usize..12) {
        let levels = build_chain(&causes(depth));
        for pair in levels.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            prop_assert!(is(upper, &Cause::new(lower.clone())));
            prop_assert!(!is(lower, &Cause::new(upper.clone())));
        }
    }

    #[test]
    fn append_never_moves_level(depth in 0usize..12, extra in 1usize..6, pick in any::<prop::sample::Index>()) {
        let causes = causes(depth);
        let levels = build_chain(&causes);
        let i = pick.index(levels.len());
        let target = &levels[i];
        let parent_before = target.parent_error().cloned();
        let root_before = target.root_cause();

        let added: Vec<Cause> = (0..extra).map(|n| new(format!("extra {n}"))).collect();
        let grown = append_into(target.clone(), added.clone()).unwrap();

        prop_assert!(grown.ptr_eq(target));
        prop_assert_eq!(grown.parent_error().cloned(), parent_before);
        prop_assert_eq!(grown.root_cause(), root_before);
        prop_assert!(is_exact(&grown, &causes[i]));
        for cause in &added {
            prop_assert!(is_exact(&grown, cause));
        }
        prop_assert_eq!(grown.current_causes().len(), extra + 1);
    }
}
