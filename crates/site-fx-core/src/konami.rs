use crate::constants::KEY_BUFFER_LEN;
use smallvec::SmallVec;

/// Classic up-up-down-down-left-right-left-right-B-A, as DOM `keyCode`s.
pub const KONAMI_CODE: [u32; KEY_BUFFER_LEN] = [38, 38, 40, 40, 37, 39, 37, 39, 66, 65];

/// "SERVICENOW" typed on the keyboard.
pub const SERVICENOW_CODE: [u32; KEY_BUFFER_LEN] = [83, 69, 82, 86, 73, 67, 69, 78, 79, 87];

/// Sliding window over the most recent key codes, matched against a target.
#[derive(Clone, Debug)]
pub struct KeySequence {
    target: SmallVec<[u32; KEY_BUFFER_LEN]>,
    buffer: SmallVec<[u32; KEY_BUFFER_LEN]>,
}

impl KeySequence {
    /// Targets longer than the window are cut to their last `KEY_BUFFER_LEN` codes.
    pub fn new(target: &[u32]) -> Self {
        let skip = target.len().saturating_sub(KEY_BUFFER_LEN);
        Self {
            target: target[skip..].iter().copied().collect(),
            buffer: SmallVec::new(),
        }
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    /// Record a key. Returns `true` when the window now equals the target; the
    /// window is cleared in that case so the same keys cannot fire twice.
    pub fn push(&mut self, key_code: u32) -> bool {
        self.buffer.push(key_code);
        if self.buffer.len() > KEY_BUFFER_LEN {
            self.buffer.remove(0);
        }
        if !self.target.is_empty() && self.buffer == self.target {
            self.buffer.clear();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_keeps_most_recent_keys() {
        let mut k = KeySequence::new(&KONAMI_CODE);
        for code in 1..=15 {
            assert!(!k.push(code));
        }
        assert_eq!(k.buffer(), &[6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn match_clears_buffer() {
        let mut k = KeySequence::new(&SERVICENOW_CODE);
        let fired: Vec<bool> = SERVICENOW_CODE.iter().map(|c| k.push(*c)).collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(fired[9]);
        assert!(k.buffer().is_empty());
    }
}
