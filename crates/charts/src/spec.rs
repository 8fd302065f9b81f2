use crate::ChartError;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(53, 162, 235);
    pub const TEAL: Rgb = Rgb(75, 192, 192);
    pub const RED: Rgb = Rgb(255, 99, 132);
    pub const PURPLE: Rgb = Rgb(153, 102, 255);
    pub const YELLOW: Rgb = Rgb(255, 206, 86);
    pub const FORECAST_BLUE: Rgb = Rgb(31, 119, 180);
    pub const FORECAST_ORANGE: Rgb = Rgb(255, 127, 14);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartKind {
    Line,
    Bar,
    /// Each series filled down to zero.
    Area,
    /// Series filled on top of each other.
    StackedArea,
    /// Uses the first series; `hole` is the inner radius as a fraction of the outer one.
    Pie { hole: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub color: Rgb,
    pub style: LineStyle,
    /// Index on the x axis of the first value.
    pub offset: usize,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            values,
            color,
            style: LineStyle::Solid,
            offset: 0,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.style = LineStyle::Dashed;
        self
    }

    pub fn starting_at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// `(x, y)` points, x being the category index.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| ((i + self.offset) as f64, *v))
            .collect()
    }
}

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    /// Category labels along x (slice labels for pies).
    pub labels: Vec<String>,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<Series>,
    /// Extra colours for pie slices.
    pub palette: Vec<Rgb>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, kind: ChartKind, labels: Vec<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            labels,
            x_title: String::new(),
            y_title: String::new(),
            series: Vec::new(),
            palette: Vec::new(),
        }
    }

    pub fn axes(mut self, x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        self.x_title = x_title.into();
        self.y_title = y_title.into();
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_palette(mut self, palette: Vec<Rgb>) -> Self {
        self.palette = palette;
        self
    }

    /// Smallest and largest y the chart must show, always including zero.
    pub fn y_range(&self) -> (f64, f64) {
        let values: Vec<f64> = match self.kind {
            ChartKind::StackedArea => stacked(&self.series).into_iter().flatten().collect(),
            _ => self
                .series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .collect(),
        };
        let finite = values.into_iter().filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo == hi {
            return (lo - 1.0, hi + 1.0);
        }
        let pad = (hi - lo) * 0.1;
        (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
    }

    /// Number of x categories the axis must cover.
    pub fn x_len(&self) -> usize {
        let from_series = self
            .series
            .iter()
            .map(|s| s.offset + s.values.len())
            .max()
            .unwrap_or(0);
        from_series.max(self.labels.len())
    }

    /// Rejects charts with nothing to draw.
    pub fn validate(&self) -> Result<(), ChartError> {
        let has_points = self
            .series
            .iter()
            .any(|s| s.values.iter().any(|v| v.is_finite()));
        if !has_points {
            return Err(ChartError::EmptyData(self.title.clone()));
        }
        if let ChartKind::Pie { .. } = self.kind {
            let total: f64 = self.series[0].values.iter().map(|v| v.abs()).sum();
            if total <= 0.0 || !total.is_finite() {
                return Err(ChartError::EmptyData(self.title.clone()));
            }
        }
        Ok(())
    }
}

/// Running totals per category, series by series.
pub fn stacked(series: &[Series]) -> Vec<Vec<f64>> {
    let mut out: Vec<Vec<f64>> = Vec::with_capacity(series.len());
    for s in series {
        let row: Vec<f64> = s
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let below = out
                    .last()
                    .and_then(|prev| prev.get(i))
                    .copied()
                    .unwrap_or(0.0);
                below + v
            })
            .collect();
        out.push(row);
    }
    out
}
