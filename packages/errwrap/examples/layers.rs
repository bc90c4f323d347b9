//! Layered error propagation: infra → domain → use case
//!
//! Run with `RUST_LOG=trace cargo run --example layers` to see the library's
//! diagnostics as well.

use errwrap::{is, new, new_error, new_error_with_message, wrap, wrap_with_message, wrapper};
use errwrap::{Cause, ChainLevel};
use std::io;
use std::sync::LazyLock;

static ERROR_COMMON_NOT_FOUND: LazyLock<Cause> = LazyLock::new(|| new("error not found"));
static ERROR_INFRA_MYSQL: LazyLock<Cause> = LazyLock::new(|| new("error infra mysql"));
static ERROR_INFRA_REDIS: LazyLock<Cause> = LazyLock::new(|| new("error infra redis"));
static ERROR_INFRA: LazyLock<Cause> = LazyLock::new(|| new("error infra layer"));
static ERROR_DOMAIN: LazyLock<Cause> = LazyLock::new(|| new("error domain layer"));
static ERROR_USE_CASE: LazyLock<Cause> = LazyLock::new(|| new("error usecase layer"));

#[derive(Debug, Clone, Copy)]
enum Scenario {
    Standard,
    RedisMissing,
    WithMessage,
    MysqlMissing,
    InfraOnly,
}

fn infra_layer(scenario: Scenario) -> Option<ChainLevel> {
    match scenario {
        Scenario::Standard => {
            let err = Cause::new(io::Error::other("standard error"));
            wrap(err, [ERROR_INFRA.clone()])
        }
        Scenario::RedisMissing => {
            let err = Cause::new(io::Error::other("resource not found"));
            wrap(
                err,
                [
                    ERROR_COMMON_NOT_FOUND.clone(),
                    ERROR_INFRA.clone(),
                    ERROR_INFRA_REDIS.clone(),
                ],
            )
        }
        Scenario::WithMessage => {
            let err = Cause::new(io::Error::other("another error"));
            new_error_with_message("using wrapper message", [err])
        }
        Scenario::MysqlMissing => {
            let err = Cause::new(io::Error::other("error again"));
            wrap_with_message(
                err,
                "unable to find resource in database",
                [
                    ERROR_INFRA.clone(),
                    ERROR_COMMON_NOT_FOUND.clone(),
                    ERROR_INFRA_MYSQL.clone(),
                ],
            )
        }
        Scenario::InfraOnly => new_error([ERROR_INFRA.clone()]),
    }
}

fn domain_layer(scenario: Scenario) -> Option<ChainLevel> {
    infra_layer(scenario).and_then(|err| wrap(err, [ERROR_DOMAIN.clone()]))
}

fn usecase_layer(scenario: Scenario) -> Option<ChainLevel> {
    domain_layer(scenario).and_then(|err| wrap(err, [ERROR_USE_CASE.clone()]))
}

fn main() {
    env_logger::init();

    for scenario in [
        Scenario::Standard,
        Scenario::RedisMissing,
        Scenario::WithMessage,
        Scenario::InfraOnly,
    ] {
        if let Some(err) = usecase_layer(scenario) {
            println!("{scenario:?}:\n{err:#}\n");
        }
    }

    let Some(err) = usecase_layer(Scenario::MysqlMissing) else {
        return;
    };

    println!("{err}\n");
    println!("{err:#}\n");
    println!("{err:?}\n");

    if is(&err, &ERROR_INFRA_REDIS) {
        println!("is ErrorInfraRedis");
    } else if is(&err, &ERROR_INFRA_MYSQL) {
        println!("is ErrorInfraMysql");
    }

    println!("is ErrorCommonNotFound {}", is(&err, &ERROR_COMMON_NOT_FOUND));

    if let Some(level) = wrapper(&err, &ERROR_COMMON_NOT_FOUND) {
        println!("{level:?}");
        println!("Print file stack trace");
        println!("{}", level.stack_trace().render(errwrap::FrameStyle::File));
        println!("Print file+line stack trace");
        println!("{}", level.stack_trace());
        println!("Print function+file+line stack trace");
        println!("{:#}", level.stack_trace());
    }

    println!("is ErrorDomain {}", is(&err, &ERROR_DOMAIN));
    println!("is ErrorUseCase {}", is(&err, &ERROR_USE_CASE));

    if let Some(level) = wrapper(&err, &ERROR_USE_CASE) {
        println!("\nprint usecase stack trace{:#}", level.stack_trace());
    }
}
