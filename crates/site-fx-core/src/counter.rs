use regex::Regex;
use std::sync::OnceLock;

/// First number in the text, thousands separators included.
fn number_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,3}(?:,\d{3})+|\d+").expect("number pattern"))
}

/// `1234567` as `1,234,567`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed-step count-up from 0 to the number found in an element's text.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterTween {
    template: String,
    grouped: bool,
    target: u64,
    current: f64,
    increment: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterFrame {
    pub text: String,
    pub done: bool,
}

impl CounterTween {
    /// Build from element text such as `"250+"`. The target is every digit in
    /// the text concatenated; text without digits yields `None`.
    pub fn from_text(text: &str, duration_ms: f64, tick_ms: f64) -> Option<Self> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        let target: u64 = digits.parse().ok()?;
        let ticks = if tick_ms > 0.0 {
            (duration_ms / tick_ms).max(1.0)
        } else {
            1.0
        };
        let grouped = number_run()
            .find(text)
            .is_some_and(|m| m.as_str().contains(','));
        Some(Self {
            template: text.to_string(),
            grouped,
            target,
            current: 0.0,
            increment: target as f64 / ticks,
        })
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Advance one tick. The final frame always shows the exact target.
    pub fn step(&mut self) -> CounterFrame {
        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.current = self.target as f64;
            CounterFrame {
                text: self.render(self.target),
                done: true,
            }
        } else {
            CounterFrame {
                text: self.render(self.current.floor() as u64),
                done: false,
            }
        }
    }

    /// Replace the first number in the original text with `value`, keeping
    /// its comma grouping. Later numbers are left alone, so `"24/7"` counts
    /// to 247 but shows `"247/7"`.
    fn render(&self, value: u64) -> String {
        let shown = if self.grouped {
            group_thousands(value)
        } else {
            value.to_string()
        };
        number_run()
            .replacen(&self.template, 1, shown.as_str())
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_and_snaps_to_target() {
        let mut c = CounterTween::from_text("150+", 160.0, 16.0).unwrap();
        assert_eq!(c.target(), 150);
        let mut frames = Vec::new();
        loop {
            let f = c.step();
            frames.push(f.text.clone());
            if f.done {
                break;
            }
        }
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0], "15+");
        assert_eq!(frames.last().map(String::as_str), Some("150+"));
    }

    #[test]
    fn keeps_surrounding_text() {
        let mut c = CounterTween::from_text("Over 40 clients", 16.0, 16.0).unwrap();
        assert_eq!(c.step().text, "Over 40 clients");
    }

    #[test]
    fn grouped_number_keeps_its_separators() {
        let mut c = CounterTween::from_text("12,500 hours", 32.0, 16.0).unwrap();
        assert_eq!(c.target(), 12_500);
        assert_eq!(c.step().text, "6,250 hours");
        let last = c.step();
        assert!(last.done);
        assert_eq!(last.text, "12,500 hours");
    }

    #[test]
    fn only_the_first_number_is_animated() {
        let mut c = CounterTween::from_text("24/7", 16.0, 16.0).unwrap();
        assert_eq!(c.target(), 247);
        assert_eq!(c.step().text, "247/7");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn text_without_digits_is_skipped() {
        assert!(CounterTween::from_text("many", 2000.0, 16.0).is_none());
    }

    #[test]
    fn zero_target_finishes_on_first_step() {
        let mut c = CounterTween::from_text("0%", 2000.0, 16.0).unwrap();
        let f = c.step();
        assert!(f.done);
        assert_eq!(f.text, "0%");
    }
}
