use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed damage expression such as `2d6+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceExpression {
    pub count: i32,
    pub size: i32,
    pub flat_bonus: i32,
}

impl DiceExpression {
    /// Substituted whenever a record's damage text has no `d<digits>` in it.
    pub const FALLBACK: DiceExpression = DiceExpression {
        count: 1,
        size: 10,
        flat_bonus: 0,
    };

    /// Returns `None` when either `count` or `size` is below 1.
    pub fn new(count: i32, size: i32, flat_bonus: i32) -> Option<Self> {
        (count >= 1 && size >= 1).then_some(Self {
            count,
            size,
            flat_bonus,
        })
    }

    pub fn max_roll(&self) -> i32 {
        self.count.saturating_mul(self.size)
    }

    /// Rounded mean of the dice sum (ties to even), excluding the flat bonus.
    pub fn average_roll(&self) -> i32 {
        let mean = f64::from(self.count) * (f64::from(self.size) + 1.0) / 2.0;
        mean.round_ties_even() as i32
    }
}

impl Default for DiceExpression {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.size)?;
        match self.flat_bonus {
            0 => Ok(()),
            b if b > 0 => write!(f, "+{}", b),
            b => write!(f, "-{}", b.unsigned_abs()),
        }
    }
}

/// Parse `[count]d<size>` followed by any number of signed integer terms.
///
/// Case-insensitive and whitespace-insensitive. The first `d` that is directly
/// followed by a digit anchors the match; signed terms after the die size are
/// summed into `flat_bonus` and anything else is skipped. Returns `None` when
/// no dice are present, when count or size is zero, or when a number does not
/// fit in an `i32`.
pub fn parse(expr: &str) -> Option<DiceExpression> {
    let s: Vec<char> = expr
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    let d_pos = (0..s.len()).find(|&i| s[i] == 'd' && s.get(i + 1).is_some_and(char::is_ascii_digit))?;

    let count_start = s[..d_pos]
        .iter()
        .rposition(|c| !c.is_ascii_digit())
        .map_or(0, |p| p + 1);
    let count = if count_start == d_pos {
        1
    } else {
        digits_to_i32(&s[count_start..d_pos])?
    };

    let size_end = digit_run_end(&s, d_pos + 1);
    let size = digits_to_i32(&s[d_pos + 1..size_end])?;

    let mut flat_bonus: i32 = 0;
    let mut i = size_end;
    while i < s.len() {
        let sign = match s[i] {
            '+' => 1,
            '-' => -1,
            _ => {
                i += 1;
                continue;
            }
        };
        let end = digit_run_end(&s, i + 1);
        if end == i + 1 {
            i += 1;
            continue;
        }
        let term = digits_to_i32(&s[i + 1..end])?;
        flat_bonus = flat_bonus.checked_add(sign * term)?;
        i = end;
    }

    DiceExpression::new(count, size, flat_bonus)
}

/// [`parse`], substituting [`DiceExpression::FALLBACK`] for unparseable text.
pub fn parse_or_default(expr: &str) -> DiceExpression {
    parse(expr).unwrap_or_else(|| {
        tracing::trace!(expr, "no dice in damage text; using 1d10");
        DiceExpression::FALLBACK
    })
}

fn digit_run_end(s: &[char], from: usize) -> usize {
    s[from..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(s.len(), |p| from + p)
}

fn digits_to_i32(digits: &[char]) -> Option<i32> {
    digits.iter().collect::<String>().parse().ok()
}
