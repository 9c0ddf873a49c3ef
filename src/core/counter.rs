use std::time::Duration;

pub const COUNTER_DURATION: Duration = Duration::from_millis(2000);
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterSuffix {
    None,
    Plus,
    Percent,
    OutOfFive,
}

impl CounterSuffix {
    fn detect(text: &str) -> Self {
        if text.contains('+') {
            CounterSuffix::Plus
        } else if text.contains('%') {
            CounterSuffix::Percent
        } else if text.contains('/') {
            CounterSuffix::OutOfFive
        } else {
            CounterSuffix::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterSuffix::None => "",
            CounterSuffix::Plus => "+",
            CounterSuffix::Percent => "%",
            CounterSuffix::OutOfFive => "/5",
        }
    }
}

/// 統計數字從 0 計數到文字中的數值
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: u64,
    suffix: CounterSuffix,
    increment: f64,
}

impl CounterAnimation {
    pub fn parse(text: &str) -> Self {
        Self::with_duration(text, COUNTER_DURATION)
    }

    /// "4.8/5" 只取斜線前的整數部分；"10,000+" 會忽略千分位
    pub fn with_duration(text: &str, duration: Duration) -> Self {
        let suffix = CounterSuffix::detect(text);
        let number_part = match suffix {
            CounterSuffix::OutOfFive => text.split('/').next().unwrap_or(""),
            _ => text,
        };
        let integer_part = number_part.split('.').next().unwrap_or("");
        let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();
        let target = digits.parse::<u64>().unwrap_or(0);

        let frames = (duration.as_millis() as f64 / FRAME_INTERVAL.as_millis() as f64).max(1.0);

        Self {
            target,
            suffix,
            increment: target as f64 / frames,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn suffix(&self) -> CounterSuffix {
        self.suffix
    }

    pub fn final_text(&self) -> String {
        format!("{}{}", self.target, self.suffix.as_str())
    }

    /// 每 16ms 一格的顯示文字，最後一格固定為目標值
    pub fn frames(&self) -> Vec<String> {
        let mut frames = Vec::new();
        let mut current = 0.0_f64;
        loop {
            current += self.increment;
            if current >= self.target as f64 {
                frames.push(self.final_text());
                return frames;
            }
            frames.push(format!("{}{}", current.floor() as u64, self.suffix.as_str()));
        }
    }

    pub async fn play<F>(&self, mut sink: F)
    where
        F: FnMut(&str),
    {
        let mut ticker = tokio::time::interval(FRAME_INTERVAL);
        for frame in self.frames() {
            ticker.tick().await;
            sink(&frame);
        }
    }
}
