//! Stateful samplers whose output depends on how often they have run.
//!
//! Pattern placeholders:
//! - `{index}` - number of earlier samples since the last restart
//! - `{uuid}` - seeded random UUID
//! - `{rand:N}` - random N-digit number

use rand::Rng;
use synth_core::Value;
use uuid::Uuid;

/// Incrementing integers: `start`, `start + step`, ...
#[derive(Debug, Clone)]
pub struct IdSampler {
    start: i64,
    step: i64,
    next: i64,
}

impl IdSampler {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            start,
            step,
            next: start,
        }
    }

    pub fn sample(&mut self) -> Value {
        let current = self.next;
        self.next = self.next.wrapping_add(self.step);
        Value::from(current)
    }

    pub fn restart(&mut self) {
        self.next = self.start;
    }
}

/// Strings built from a pattern.
#[derive(Debug, Clone)]
pub struct PatternSampler {
    pattern: String,
    index: u64,
}

impl PatternSampler {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            index: 0,
        }
    }

    pub fn sample<R: Rng>(&mut self, rng: &mut R) -> Value {
        let value = expand_pattern(&self.pattern, rng, self.index);
        self.index += 1;
        Value::String(value)
    }

    pub fn restart(&mut self) {
        self.index = 0;
    }
}

/// Expand the placeholders of a pattern.
fn expand_pattern<R: Rng>(pattern: &str, rng: &mut R, index: u64) -> String {
    let mut result = pattern.replace("{index}", &index.to_string());

    while result.contains("{uuid}") {
        result = result.replacen("{uuid}", &random_uuid(rng).to_string(), 1);
    }

    // Replace {rand:N} placeholders left to right
    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("{rand:") {
        let start = search_from + offset;
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let end = start + len;
        match result[start + 6..end].parse::<usize>() {
            Ok(digits) => {
                let number = random_digits(rng, digits);
                result = format!("{}{}{}", &result[..start], number, &result[end + 1..]);
                search_from = start + number.len();
            }
            // Not a placeholder; leave it as literal text
            Err(_) => search_from = end + 1,
        }
    }

    result
}

/// A random number with exactly `digits` digits.
fn random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    let mut result = String::with_capacity(digits);
    for i in 0..digits {
        // First digit is 1-9 to avoid leading zeros
        let d: u8 = if i == 0 {
            rng.gen_range(1..10)
        } else {
            rng.gen_range(0..10)
        };
        result.push(char::from(b'0' + d));
    }
    result
}

/// A version 4 UUID drawn from the given RNG.
pub fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    // Set version (4) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}
