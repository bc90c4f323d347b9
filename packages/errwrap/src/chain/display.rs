//! Display and Debug implementations for ChainLevel

use super::types::ChainLevel;
use crate::format::{ChainFormat, Verbosity};
use std::fmt::{self, Write};

impl ChainLevel {
    /// Render at `verbosity` using the separators in `format`
    #[must_use]
    pub fn render(&self, verbosity: Verbosity, format: &ChainFormat) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, verbosity, format);
        out
    }

    fn write_to(
        &self,
        out: &mut impl Write,
        verbosity: Verbosity,
        format: &ChainFormat,
    ) -> fmt::Result {
        match verbosity {
            Verbosity::Short => self.write_short(out, format),
            Verbosity::Full => self.write_full(out, format),
            Verbosity::FullWithStack => {
                self.write_full(out, format)?;
                let root = self.root_cause().unwrap_or_else(|| self.clone());
                write!(out, "{:#}", root.stack_trace())
            }
        }
    }

    fn write_short(&self, out: &mut impl Write, format: &ChainFormat) -> fmt::Result {
        let causes = self.inner.causes.load();
        let context = self.context_message();

        if let [cause] = causes.as_slice() {
            write!(out, "{cause}")?;
            if !context.is_empty() {
                write!(out, "{}{context}", format.legacy_separator)?;
            }
            return Ok(());
        }

        for (i, cause) in causes.iter().enumerate() {
            if i == 0 {
                write!(out, "{}{cause}", format.first_bullet)?;
            } else {
                write!(out, "\n{}{cause}", format.indent)?;
            }
        }
        if !context.is_empty() {
            write!(out, "\n{}{}{context}", format.indent, format.context_label)?;
        }
        Ok(())
    }

    fn write_full(&self, out: &mut impl Write, format: &ChainFormat) -> fmt::Result {
        for (i, level) in self.levels().enumerate() {
            if i > 0 {
                out.write_char('\n')?;
            }
            level.write_short(out, format)?;
        }
        Ok(())
    }
}

/// `{}` renders this level only, `{:#}` the whole chain down to the root.
impl fmt::Display for ChainLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbosity = if f.alternate() {
            Verbosity::Full
        } else {
            Verbosity::Short
        };
        self.write_to(f, verbosity, &ChainFormat::STANDARD)
    }
}

/// The whole chain followed by the root level's stack trace.
impl fmt::Debug for ChainLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, Verbosity::FullWithStack, &ChainFormat::STANDARD)
    }
}
