/// 公司歷程進度條，每個年份一個點
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineProgress {
    years: Vec<String>,
    reached: Option<usize>,
}

impl TimelineProgress {
    pub fn new<I, S>(years: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let years: Vec<String> = years.into_iter().map(Into::into).collect();
        // 第一個年份一開始就是啟用狀態
        let reached = if years.is_empty() { None } else { Some(0) };
        Self { years, reached }
    }

    /// 某年份的卡片進入畫面時呼叫；未知年份不改變狀態
    pub fn mark_visible(&mut self, year: &str) -> Option<f32> {
        let index = self.years.iter().position(|y| y == year)?;
        self.reached = Some(index);
        Some(self.percent())
    }

    pub fn percent(&self) -> f32 {
        match self.reached {
            Some(index) if !self.years.is_empty() => {
                (index + 1) as f32 / self.years.len() as f32 * 100.0
            }
            _ => 0.0,
        }
    }

    pub fn active_dots(&self) -> Vec<bool> {
        (0..self.years.len())
            .map(|i| self.reached.is_some_and(|reached| i <= reached))
            .collect()
    }
}
