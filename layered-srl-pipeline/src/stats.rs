//! End-of-run counters and the status report.

use std::time::Duration;

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Sentences the annotator produced
    pub sentences_total: usize,
    /// Sentences that reached the corpus
    pub sentences_fused: usize,
    /// Sentences left out of the corpus
    pub sentences_failed: usize,
    /// Sentences handed to the role labeler
    pub sentences_labeled: usize,
    /// Wall time of the whole run
    pub elapsed: Duration,
    /// Time the role labeler reported spending
    pub parsing_time: Duration,
}

impl RunStats {
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Milliseconds per labeled sentence; 0 when nothing was labeled.
    pub fn ms_per_sentence(&self) -> u128 {
        match self.sentences_labeled {
            0 => 0,
            n => self.elapsed_ms() / n as u128,
        }
    }

    /// The labeler's status followed by total time and speed.
    pub fn status_report(&self, labeler_status: &str) -> String {
        format!(
            "{}\n\nTotal parsing time (ms):  {}\nOverall speed (ms/sen):   {}",
            labeler_status,
            insert_commas(self.elapsed_ms()),
            insert_commas(self.ms_per_sentence())
        )
    }
}

/// Group digits in threes: `1234567` becomes `1,234,567`.
pub fn insert_commas(value: u128) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_commas() {
        assert_eq!(insert_commas(0), "0");
        assert_eq!(insert_commas(999), "999");
        assert_eq!(insert_commas(1000), "1,000");
        assert_eq!(insert_commas(1234567), "1,234,567");
        assert_eq!(insert_commas(100000), "100,000");
    }

    #[test]
    fn test_status_report() {
        let stats = RunStats {
            sentences_labeled: 4,
            elapsed: Duration::from_millis(12_345),
            ..Default::default()
        };

        insta::assert_snapshot!(stats.status_report("Labeled 4 sentences"), @r###"
        Labeled 4 sentences

        Total parsing time (ms):  12,345
        Overall speed (ms/sen):   3,086
        "###);
    }

    #[test]
    fn test_speed_without_sentences() {
        let stats = RunStats {
            elapsed: Duration::from_millis(50),
            ..Default::default()
        };
        assert_eq!(stats.ms_per_sentence(), 0);
    }
}
