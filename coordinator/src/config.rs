use std::{env, io, num::NonZeroUsize, str::FromStr};

use protocol::{Columns, Hyperparameters, ModelShape};

const DEFAULT_INPUT_SIZE: usize = 4;
const DEFAULT_HIDDEN_SIZE: usize = 8;
const DEFAULT_QUORUM: usize = 2;

/// Static coordinator configuration, fixed for the process lifetime.
///
/// The model shape chosen here is the single source of truth for every flat
/// vector exchanged during the run.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub model: ModelShape,
    pub hyperparameters: Hyperparameters,
    pub columns: Columns,
    pub quorum: NonZeroUsize,
    /// Optional seed for deterministic global weight initialization.
    pub seed: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        let input = NonZeroUsize::new(DEFAULT_INPUT_SIZE).unwrap();
        let hidden = NonZeroUsize::new(DEFAULT_HIDDEN_SIZE).unwrap();

        Self {
            model: ModelShape::mlp(input, hidden),
            hyperparameters: Hyperparameters {
                learning_rate: 0.01,
                epochs: 10,
                batch_size: 16,
            },
            columns: Columns {
                features: (1..=DEFAULT_INPUT_SIZE).map(|i| format!("f{i}")).collect(),
                target: "label".to_string(),
            },
            quorum: NonZeroUsize::new(DEFAULT_QUORUM).unwrap(),
            seed: None,
        }
    }
}

impl CoordinatorConfig {
    /// Builds a configuration from environment variables, keeping the
    /// defaults for anything unset.
    ///
    /// Recognized variables: `MODEL` (`mlp` or `logistic_regression`),
    /// `INPUT_SIZE`, `HIDDEN_SIZE`, `QUORUM`, `SEED`.
    ///
    /// # Errors
    /// Returns an io error when a variable is set but unparseable.
    pub fn from_env() -> io::Result<Self> {
        let defaults = Self::default();

        let input = parse_env("INPUT_SIZE")?
            .unwrap_or(NonZeroUsize::new(DEFAULT_INPUT_SIZE).unwrap());
        let hidden = parse_env("HIDDEN_SIZE")?
            .unwrap_or(NonZeroUsize::new(DEFAULT_HIDDEN_SIZE).unwrap());

        let model = match env::var("MODEL") {
            Ok(kind) => model_for(&kind, input, hidden)?,
            Err(_) => ModelShape::mlp(input, hidden),
        };

        let columns = Columns {
            features: (1..=input.get()).map(|i| format!("f{i}")).collect(),
            target: defaults.columns.target,
        };

        Ok(Self {
            model,
            hyperparameters: defaults.hyperparameters,
            columns,
            quorum: parse_env("QUORUM")?.unwrap_or(defaults.quorum),
            seed: parse_env("SEED")?,
        })
    }
}

/// Parses an optional environment variable, mapping parse failures to io
/// errors that name the variable.
fn parse_env<T: FromStr>(name: &str) -> io::Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> io::Result<T> {
    raw.parse()
        .map_err(|_| io::Error::other(format!("invalid {name} value: {raw}")))
}

/// Resolves a `MODEL` value to its shape.
fn model_for(kind: &str, input: NonZeroUsize, hidden: NonZeroUsize) -> io::Result<ModelShape> {
    match kind {
        "mlp" => Ok(ModelShape::mlp(input, hidden)),
        "logistic_regression" => Ok(ModelShape::logistic_regression(input)),
        other => Err(io::Error::other(format!("unknown MODEL value: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_round_setup() {
        let config = CoordinatorConfig::default();

        assert_eq!(config.quorum.get(), 2);
        assert_eq!(config.model.total_len(), 4 * 8 + 8 + 8 + 1);
        assert_eq!(config.columns.features.len(), 4);
        assert!(config.seed.is_none());
    }

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn parse_value_names_the_variable_on_failure() {
        let quorum: NonZeroUsize = parse_value("QUORUM", "3").unwrap();
        assert_eq!(quorum.get(), 3);

        let err = parse_value::<NonZeroUsize>("QUORUM", "0").unwrap_err();
        assert!(err.to_string().contains("QUORUM"));

        assert!(parse_value::<u64>("SEED", "not-a-number").is_err());
    }

    #[test]
    fn model_for_resolves_both_kinds() {
        let logreg = model_for("logistic_regression", nz(4), nz(8)).unwrap();
        assert_eq!(logreg.total_len(), 5);

        let mlp = model_for("mlp", nz(4), nz(8)).unwrap();
        assert_eq!(mlp.total_len(), 4 * 8 + 8 + 8 + 1);

        assert!(model_for("transformer", nz(4), nz(8)).is_err());
    }
}
