use crate::error::Error;
use crate::ops::{ArithOp, MathOp};
use crate::options::{LossyPolicy, Options};
use crate::parser::{parse, parse_ptype};
use crate::registry::Registry;

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "vctr", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// How lossy casts are reported: warn, ignore or error
    #[arg(long, default_value_t = LossyPolicy::Warn, global = true)]
    pub lossy: LossyPolicy,

    /// Require operands of equal size instead of broadcasting size-1 operands
    #[arg(long, global = true)]
    pub no_recycle: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Common type of two types, e.g. `ptype2 integer 'decimal(digits = 1)'`
    Ptype2 { x: String, y: String },

    /// Cast a literal to a type
    Cast {
        #[arg(allow_hyphen_values = true)]
        value: String,
        to: String,
    },

    /// Combine literals into one vector of their common type
    C {
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Apply an arithmetic operator; unary when `y` is omitted
    Arith {
        op: ArithOp,
        #[arg(allow_hyphen_values = true)]
        x: String,
        #[arg(allow_hyphen_values = true)]
        y: Option<String>,
    },

    /// Apply a math function
    Math {
        op: MathOp,
        #[arg(allow_hyphen_values = true)]
        x: String,
    },

    /// Sort a literal, missing values last
    Sort {
        #[arg(allow_hyphen_values = true)]
        x: String,
        #[arg(short, long)]
        descending: bool,
    },

    /// Unique values of a literal, in order of first occurrence
    Unique {
        #[arg(allow_hyphen_values = true)]
        x: String,
    },
}

impl Cli {
    pub fn options(&self) -> Options {
        Options::default()
            .with_lossy(self.lossy)
            .with_recycle(!self.no_recycle)
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

impl Command {
    /// Run the command, rendering its result for display
    pub fn run(&self, registry: &Registry) -> Result<String, Error> {
        let r = registry;
        Ok(match self {
            Command::Ptype2 { x, y } => {
                let (x, y) = (parse_ptype(r, x)?, parse_ptype(r, y)?);
                r.common_type(&x, &y)?.to_string()
            }
            Command::Cast { value, to } => {
                let (value, to) = (parse(r, value)?, parse_ptype(r, to)?);
                r.cast(&value, &to)?.to_string()
            }
            Command::C { values } => {
                let values = values
                    .iter()
                    .map(|v| parse(r, v))
                    .collect::<Result<Vec<_>, _>>()?;
                r.combine(&values)?.to_string()
            }
            Command::Arith { op, x, y } => {
                let x = parse(r, x)?;
                let y = y.as_deref().map(|y| parse(r, y)).transpose()?;
                r.arith(*op, &x, y.as_ref())?.to_string()
            }
            Command::Math { op, x } => r.math(*op, &parse(r, x)?)?.to_string(),
            Command::Sort { x, descending } => r.sort(&parse(r, x)?, *descending)?.to_string(),
            Command::Unique { x } => r.unique(&parse(r, x)?)?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run(args: &[&str]) -> Result<String, Error> {
        let cli = Cli::parse_from(std::iter::once("vctr").chain(args.iter().copied()));
        cli.command.run(&Registry::with_options(cli.options()))
    }

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::parse_from(["vctr", "--lossy", "error", "--no-recycle", "c", "1L"]);
        assert_eq!(cli.options().lossy, LossyPolicy::Error);
        assert!(!cli.options().recycle);
        assert_eq!(Cli::parse_from(["vctr", "-vv", "c"]).log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn subcommands() {
        assert_eq!(run(&["c", "1L", "c(2.5, NA)"]), Ok("[1, 2.5, NA]".to_string()));
        assert_eq!(run(&["ptype2", "integer", "double"]), Ok("<double>".to_string()));
        assert_eq!(run(&["arith", "+", "c(1L, 2L)", "1L"]), Ok("[2, 3]".to_string()));
        assert_eq!(run(&["arith", "-", "-1L"]), Ok("[1]".to_string()));
        assert_eq!(run(&["math", "sum", "c(1L, 2L)"]), Ok("[3]".to_string()));
        assert_eq!(run(&["sort", "c(3L, NA, 1L)"]), Ok("[1, 3, NA]".to_string()));
        assert_eq!(run(&["unique", "c(1L, 1L, 2L)"]), Ok("[1, 2]".to_string()));
    }

    #[test]
    fn lossy_policy_applies_to_casts() {
        assert_eq!(run(&["cast", "c(1.5)", "integer"]), Ok("[1]".to_string()));
        assert!(matches!(
            run(&["--lossy", "error", "cast", "c(1.5)", "integer"]),
            Err(Error::LossyCast { .. })
        ));
    }

    #[test]
    fn recycling_can_be_disabled() {
        assert!(matches!(
            run(&["--no-recycle", "arith", "+", "c(1L, 2L)", "1L"]),
            Err(Error::IncompatibleSize { .. })
        ));
    }
}
