//! Random-variable specs and seeded sample streams
//!
//! A [`RandomVariable`] describes a distribution; a [`RandomStream`] draws
//! from one with its own seeded generator. Specs can be written compactly
//! (`"exponential:0.2"`, `"uniform:0.5,1.5"`, `"constant:1"`, or a bare
//! number) or as a TOML table with a `kind` key.

use std::fmt;
use std::str::FromStr;

use csmarl_core::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal, Uniform};
use serde::{Deserialize, Serialize};

/// A distribution to sample from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RandomVariableRepr", into = "String")]
pub enum RandomVariable {
    /// Always the same value
    Constant { value: f64 },
    /// Uniform on `[min, max)`
    Uniform { min: f64, max: f64 },
    /// Exponential with the given mean, optionally truncated at `bound`
    Exponential { mean: f64, bound: Option<f64> },
    /// Gaussian
    Normal { mean: f64, std_dev: f64 },
}

impl RandomVariable {
    pub fn constant(value: f64) -> Self {
        RandomVariable::Constant { value }
    }

    /// Check parameters; called before any stream is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidRandomVariable(msg));
        match *self {
            RandomVariable::Constant { value } if !value.is_finite() => {
                invalid(format!("constant must be finite, got {}", value))
            }
            RandomVariable::Uniform { min, max }
                if !(min.is_finite() && max.is_finite() && min <= max) =>
            {
                invalid(format!("uniform needs finite min <= max, got [{}, {})", min, max))
            }
            RandomVariable::Exponential { mean, .. } if !(mean.is_finite() && mean > 0.0) => {
                invalid(format!("exponential mean must be positive, got {}", mean))
            }
            RandomVariable::Exponential {
                bound: Some(bound), ..
            } if !(bound > 0.0) => invalid(format!("exponential bound must be positive, got {}", bound)),
            RandomVariable::Normal { mean, std_dev }
                if !(mean.is_finite() && std_dev.is_finite() && std_dev >= 0.0) =>
            {
                invalid(format!("normal needs finite mean and std_dev >= 0, got {}, {}", mean, std_dev))
            }
            _ => Ok(()),
        }
    }

    /// Smallest value this distribution can produce
    pub fn lower_bound(&self) -> f64 {
        match *self {
            RandomVariable::Constant { value } => value,
            RandomVariable::Uniform { min, .. } => min,
            RandomVariable::Exponential { .. } => 0.0,
            RandomVariable::Normal { std_dev, mean } if std_dev == 0.0 => mean,
            RandomVariable::Normal { .. } => f64::NEG_INFINITY,
        }
    }

    /// Largest integer [`RandomStream::integer`] can return
    ///
    /// Uniform and bounded exponential draws never reach their upper bound.
    pub fn max_integer(&self) -> f64 {
        match *self {
            RandomVariable::Uniform { min, max } if min < max => max.ceil() - 1.0,
            RandomVariable::Exponential {
                bound: Some(bound), ..
            } => bound.ceil() - 1.0,
            _ => self.upper_bound().floor(),
        }
    }

    /// Largest value this distribution can produce
    pub fn upper_bound(&self) -> f64 {
        match *self {
            RandomVariable::Constant { value } => value,
            RandomVariable::Uniform { max, .. } => max,
            RandomVariable::Exponential { bound, .. } => bound.unwrap_or(f64::INFINITY),
            RandomVariable::Normal { std_dev, mean } if std_dev == 0.0 => mean,
            RandomVariable::Normal { .. } => f64::INFINITY,
        }
    }
}

impl Default for RandomVariable {
    fn default() -> Self {
        RandomVariable::constant(1.0)
    }
}

impl fmt::Display for RandomVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandomVariable::Constant { value } => write!(f, "constant:{}", value),
            RandomVariable::Uniform { min, max } => write!(f, "uniform:{},{}", min, max),
            RandomVariable::Exponential { mean, bound: None } => write!(f, "exponential:{}", mean),
            RandomVariable::Exponential {
                mean,
                bound: Some(bound),
            } => write!(f, "exponential:{},{}", mean, bound),
            RandomVariable::Normal { mean, std_dev } => write!(f, "normal:{},{}", mean, std_dev),
        }
    }
}

impl From<RandomVariable> for String {
    fn from(value: RandomVariable) -> Self {
        value.to_string()
    }
}

impl FromStr for RandomVariable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRandomVariable(s.to_string());
        let s = s.trim();

        if let Ok(value) = s.parse::<f64>() {
            let rv = RandomVariable::constant(value);
            rv.validate()?;
            return Ok(rv);
        }

        let (kind, params) = s.split_once(':').ok_or_else(invalid)?;
        let params: Vec<f64> = params
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| invalid())?;

        let rv = match (kind.trim().to_ascii_lowercase().as_str(), params.as_slice()) {
            ("constant", [value]) => RandomVariable::Constant { value: *value },
            ("uniform", [min, max]) => RandomVariable::Uniform { min: *min, max: *max },
            ("exponential", [mean]) => RandomVariable::Exponential {
                mean: *mean,
                bound: None,
            },
            ("exponential", [mean, bound]) => RandomVariable::Exponential {
                mean: *mean,
                bound: Some(*bound),
            },
            ("normal", [mean, std_dev]) => RandomVariable::Normal {
                mean: *mean,
                std_dev: *std_dev,
            },
            _ => return Err(invalid()),
        };
        rv.validate()?;
        Ok(rv)
    }
}

/// Accepted on-disk forms of a random variable
#[derive(Deserialize)]
#[serde(untagged)]
enum RandomVariableRepr {
    Number(f64),
    Compact(String),
    Table(RandomVariableTable),
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RandomVariableTable {
    Constant {
        value: f64,
    },
    Uniform {
        min: f64,
        max: f64,
    },
    Exponential {
        mean: f64,
        #[serde(default)]
        bound: Option<f64>,
    },
    Normal {
        mean: f64,
        std_dev: f64,
    },
}

impl TryFrom<RandomVariableRepr> for RandomVariable {
    type Error = ConfigError;

    fn try_from(repr: RandomVariableRepr) -> Result<Self, Self::Error> {
        let rv = match repr {
            RandomVariableRepr::Number(value) => RandomVariable::Constant { value },
            RandomVariableRepr::Compact(text) => return text.parse(),
            RandomVariableRepr::Table(table) => match table {
                RandomVariableTable::Constant { value } => RandomVariable::Constant { value },
                RandomVariableTable::Uniform { min, max } => RandomVariable::Uniform { min, max },
                RandomVariableTable::Exponential { mean, bound } => {
                    RandomVariable::Exponential { mean, bound }
                }
                RandomVariableTable::Normal { mean, std_dev } => {
                    RandomVariable::Normal { mean, std_dev }
                }
            },
        };
        rv.validate()?;
        Ok(rv)
    }
}

/// Derive the seed of one stream from the run seed
///
/// Distinct `(source, stream)` pairs give distinct seeds for the same run
/// seed.
pub fn stream_seed(run_seed: u64, source: u32, stream: u32) -> u64 {
    run_seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (((source as u64) << 32) | stream as u64)
}

enum Sampler {
    Constant(f64),
    Uniform(Uniform<f64>),
    Exponential(Exp<f64>),
    TruncatedExponential { mean: f64, cdf_at_bound: f64 },
    Normal(Normal<f64>),
}

/// A seeded source of samples from one [`RandomVariable`]
pub struct RandomStream {
    spec: RandomVariable,
    sampler: Sampler,
    rng: StdRng,
}

impl RandomStream {
    /// Build a stream; fails if the spec is invalid
    pub fn new(spec: RandomVariable, seed: u64) -> Result<Self, ConfigError> {
        spec.validate()?;
        let invalid = |e: String| ConfigError::InvalidRandomVariable(format!("{}: {}", spec, e));

        let sampler = match spec {
            RandomVariable::Constant { value } => Sampler::Constant(value),
            RandomVariable::Uniform { min, max } if min == max => Sampler::Constant(min),
            RandomVariable::Uniform { min, max } => {
                Sampler::Uniform(Uniform::new(min, max).map_err(|e| invalid(e.to_string()))?)
            }
            RandomVariable::Exponential { mean, bound: None } => {
                Sampler::Exponential(Exp::new(1.0 / mean).map_err(|e| invalid(e.to_string()))?)
            }
            RandomVariable::Exponential {
                mean,
                bound: Some(bound),
            } => Sampler::TruncatedExponential {
                mean,
                cdf_at_bound: 1.0 - (-bound / mean).exp(),
            },
            RandomVariable::Normal { mean, std_dev } => {
                Sampler::Normal(Normal::new(mean, std_dev).map_err(|e| invalid(e.to_string()))?)
            }
        };

        Ok(Self {
            spec,
            sampler,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn spec(&self) -> &RandomVariable {
        &self.spec
    }

    /// Draw one value
    pub fn value(&mut self) -> f64 {
        match &self.sampler {
            Sampler::Constant(value) => *value,
            Sampler::Uniform(uniform) => uniform.sample(&mut self.rng),
            Sampler::Exponential(exp) => exp.sample(&mut self.rng),
            Sampler::TruncatedExponential { mean, cdf_at_bound } => {
                // inverse CDF restricted to [0, bound)
                let u: f64 = self.rng.random::<f64>() * cdf_at_bound;
                -mean * (1.0 - u).ln()
            }
            Sampler::Normal(normal) => normal.sample(&mut self.rng),
        }
    }

    /// Draw one value truncated to an unsigned integer (negatives become 0)
    pub fn integer(&mut self) -> u32 {
        self.value() as u32
    }
}

impl fmt::Debug for RandomStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomStream").field("spec", &self.spec).finish()
    }
}
