//! Numeric samplers: integers, doubles and booleans.

use crate::bounds::{Bounds, Unsatisfiable};
use rand::Rng;
use synth_core::Value;

/// Uniform integers in `[min, max)`.
#[derive(Debug, Clone)]
pub struct IntSampler {
    min: i64,
    max: i64,
}

impl IntSampler {
    pub fn new(min: i64, max: i64) -> Result<Self, String> {
        if min >= max {
            return Err(format!("min ({min}) must be below max ({max})"));
        }
        Ok(Self { min, max })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R, bounds: &Bounds) -> Result<Value, Unsatisfiable> {
        let (lo, hi) = self.narrowed_range(bounds)?;

        if let Some(target) = bounds.equals() {
            let n = target
                .as_f64()
                .filter(|f| f.fract() == 0.0)
                .ok_or_else(|| Unsatisfiable(format!("{target} is not an integer")))?
                as i64;
            if n < lo || n >= hi {
                return Err(Unsatisfiable(format!("{n} is outside [{lo}, {hi})")));
            }
            return Ok(Value::from(n));
        }

        if lo >= hi {
            return Err(Unsatisfiable(format!("empty range [{lo}, {hi})")));
        }
        Ok(Value::from(rng.gen_range(lo..hi)))
    }

    /// Half-open integer range after applying numeric limits.
    fn narrowed_range(&self, bounds: &Bounds) -> Result<(i64, i64), Unsatisfiable> {
        let mut lo = self.min;
        let mut hi = self.max;
        if let Some((v, inclusive)) = bounds.numeric_lower()? {
            let first = if inclusive { v.ceil() } else { v.floor() + 1.0 };
            lo = lo.max(first as i64);
        }
        if let Some((v, inclusive)) = bounds.numeric_upper()? {
            let past_last = if inclusive { v.floor() + 1.0 } else { v.ceil() };
            hi = hi.min(past_last as i64);
        }
        Ok((lo, hi))
    }
}

/// Uniform floats in `[min, max)`.
#[derive(Debug, Clone)]
pub struct DoubleSampler {
    min: f64,
    max: f64,
}

impl DoubleSampler {
    pub fn new(min: f64, max: f64) -> Result<Self, String> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(format!("min ({min}) must be below max ({max})"));
        }
        Ok(Self { min, max })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R, bounds: &Bounds) -> Result<Value, Unsatisfiable> {
        let mut lo = self.min;
        let mut hi = self.max;
        if let Some((v, inclusive)) = bounds.numeric_lower()? {
            lo = lo.max(if inclusive { v } else { next_up(v) });
        }
        if let Some((v, inclusive)) = bounds.numeric_upper()? {
            hi = hi.min(if inclusive { next_up(v) } else { v });
        }

        if let Some(target) = bounds.equals() {
            let x = target
                .as_f64()
                .ok_or_else(|| Unsatisfiable(format!("{target} is not a number")))?;
            if x < lo || x >= hi {
                return Err(Unsatisfiable(format!("{x} is outside [{lo}, {hi})")));
            }
            return Ok(target.clone());
        }

        if lo >= hi {
            return Err(Unsatisfiable(format!("empty range [{lo}, {hi})")));
        }
        Ok(Value::from(rng.gen_range(lo..hi)))
    }
}

/// Smallest double strictly greater than `x`.
fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Booleans that are `true` with probability `true_weight`.
#[derive(Debug, Clone)]
pub struct BoolSampler {
    true_weight: f64,
}

impl BoolSampler {
    pub fn new(true_weight: f64) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&true_weight) {
            return Err(format!("true_weight ({true_weight}) must be within [0, 1]"));
        }
        Ok(Self { true_weight })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Value {
        Value::Bool(rng.gen_bool(self.true_weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_int_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = IntSampler::new(10, 20).unwrap();

        for _ in 0..100 {
            let v = sampler.sample(&mut rng, &Bounds::default()).unwrap();
            let n = v.as_i64().unwrap();
            assert!((10..20).contains(&n));
        }
    }

    #[test]
    fn test_int_rejects_empty_range() {
        assert!(IntSampler::new(5, 5).is_err());
    }

    #[test]
    fn test_int_greater_than() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = IntSampler::new(0, 100).unwrap();
        let mut bounds = Bounds::default();
        bounds.raise_lower(json!(97), false).unwrap();

        for _ in 0..50 {
            let n = sampler.sample(&mut rng, &bounds).unwrap().as_i64().unwrap();
            assert!(n == 98 || n == 99);
        }
    }

    #[test]
    fn test_int_fractional_limits() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = IntSampler::new(0, 100).unwrap();
        let mut bounds = Bounds::default();
        bounds.raise_lower(json!(4.5), false).unwrap();
        bounds.reduce_upper(json!(5.5), false).unwrap();

        assert_eq!(sampler.sample(&mut rng, &bounds).unwrap(), json!(5));
    }

    #[test]
    fn test_int_unsatisfiable() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = IntSampler::new(0, 100).unwrap();
        let mut bounds = Bounds::default();
        bounds.raise_lower(json!(99), false).unwrap();

        assert!(sampler.sample(&mut rng, &bounds).is_err());
    }

    #[test]
    fn test_int_equals() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = IntSampler::new(0, 100).unwrap();

        let mut bounds = Bounds::default();
        bounds.require_equal(json!(42)).unwrap();
        assert_eq!(sampler.sample(&mut rng, &bounds).unwrap(), json!(42));

        let mut bounds = Bounds::default();
        bounds.require_equal(json!(100)).unwrap();
        assert!(sampler.sample(&mut rng, &bounds).is_err());
    }

    #[test]
    fn test_double_lower_than() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = DoubleSampler::new(0.0, 1.0).unwrap();
        let mut bounds = Bounds::default();
        bounds.reduce_upper(json!(0.25), false).unwrap();

        for _ in 0..100 {
            let x = sampler.sample(&mut rng, &bounds).unwrap().as_f64().unwrap();
            assert!((0.0..0.25).contains(&x));
        }
    }

    #[test]
    fn test_double_strictly_greater() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampler = DoubleSampler::new(0.0, 1.0).unwrap();
        let mut bounds = Bounds::default();
        bounds.raise_lower(json!(0.5), false).unwrap();

        for _ in 0..100 {
            let x = sampler.sample(&mut rng, &bounds).unwrap().as_f64().unwrap();
            assert!(x > 0.5 && x < 1.0);
        }
    }

    #[test]
    fn test_next_up() {
        assert!(next_up(1.0) > 1.0);
        assert!(next_up(-1.0) > -1.0);
        assert!(next_up(0.0) > 0.0);
        assert!(next_up(-0.0) > 0.0);
    }

    #[test]
    fn test_bool_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(BoolSampler::new(1.5).is_err());

        let always = BoolSampler::new(1.0).unwrap();
        let never = BoolSampler::new(0.0).unwrap();
        for _ in 0..20 {
            assert_eq!(always.sample(&mut rng), json!(true));
            assert_eq!(never.sample(&mut rng), json!(false));
        }
    }
}
