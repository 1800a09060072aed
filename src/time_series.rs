#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.wpm)
    }
}

/// WPM samples taken once per elapsed whole second of a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WpmSeries {
    points: Vec<TimeSeriesPoint>,
    last_second: u64,
}

impl WpmSeries {
    /// Record `wpm` if a new whole second has passed since the last sample
    pub fn sample(&mut self, elapsed_secs: f64, wpm: f64) {
        let second = elapsed_secs.floor() as u64;
        if second > self.last_second {
            self.last_second = second;
            self.points.push(TimeSeriesPoint::new(second as f64, wpm));
        }
    }

    /// Closing sample at the exact finish time
    pub fn finish(&mut self, elapsed_secs: f64, wpm: f64) {
        if elapsed_secs <= 0.0 {
            return;
        }
        match self.points.last() {
            Some(last) if last.t >= elapsed_secs => {}
            _ => self.points.push(TimeSeriesPoint::new(elapsed_secs, wpm)),
        }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Population standard deviation of the samples; lower is steadier
    pub fn consistency(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let mean = self.points.iter().map(|p| p.wpm).sum::<f64>() / n;
        let variance = self
            .points
            .iter()
            .map(|p| {
                let diff = mean - p.wpm;
                diff * diff
            })
            .sum::<f64>()
            / n;
        Some(variance.sqrt())
    }
}
