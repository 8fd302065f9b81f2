use chrono::{DateTime, Local};
use charts::{ChartRenderer, ChartSpec, RasterImage};
use kpi_engine::KpiCard;
use tracing::warn;

/// Pixel size charts are rasterised at before being placed on a page.
pub const CHART_SIZE: (u32, u32) = (1000, 500);

/// Which dashboard a report was exported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Financial,
    AdministrativeAccounts,
    Sales,
    OperationalExpenses,
    SalesForecast,
}

impl ReportType {
    pub fn title(self) -> &'static str {
        match self {
            ReportType::Financial => "Financial Report",
            ReportType::AdministrativeAccounts => "Administrative Accounts Report",
            ReportType::Sales => "Sales Report",
            ReportType::OperationalExpenses => "Operational Expenses Report",
            ReportType::SalesForecast => "Sales Forecast Report",
        }
    }

    /// Filename prefix, e.g. `Financial_Report`.
    pub fn stem(self) -> &'static str {
        match self {
            ReportType::Financial => "Financial_Report",
            ReportType::AdministrativeAccounts => "Administrative_Accounts_Report",
            ReportType::Sales => "Sales_Report",
            ReportType::OperationalExpenses => "Operational_Expenses_Report",
            ReportType::SalesForecast => "Sales_Forecast_Report",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: Vec<String>) -> Self {
        self.rows.push(cells);
        self
    }
}

#[derive(Debug, Clone)]
pub enum Block {
    Header { title: String, subtitle: String },
    Section(String),
    Paragraph(String),
    Cards(Vec<KpiCard>),
    Chart { title: String, image: RasterImage },
    Table(Table),
    PageBreak,
}

/// Ordered content of one exported report.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportType,
    pub generated_at: DateTime<Local>,
    pub blocks: Vec<Block>,
}

impl Report {
    /// Starts a report with its header; `generated_at` also names the file.
    pub fn new(kind: ReportType, generated_at: DateTime<Local>) -> Self {
        let subtitle = format!(
            "Generated on {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        Self {
            kind,
            generated_at,
            blocks: vec![Block::Header {
                title: kind.title().to_string(),
                subtitle,
            }],
        }
    }

    pub fn section(&mut self, title: &str) -> &mut Self {
        self.blocks.push(Block::Section(title.to_string()));
        self
    }

    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        self.blocks.push(Block::Paragraph(text.to_string()));
        self
    }

    pub fn cards(&mut self, cards: &[KpiCard]) -> &mut Self {
        if !cards.is_empty() {
            self.blocks.push(Block::Cards(cards.to_vec()));
        }
        self
    }

    /// Rasterises `spec` and appends it. A chart that fails is logged and left out.
    pub fn chart(&mut self, renderer: &dyn ChartRenderer, spec: &ChartSpec) -> &mut Self {
        match renderer.render(spec, CHART_SIZE) {
            Ok(image) => self.blocks.push(Block::Chart {
                title: spec.title.clone(),
                image,
            }),
            Err(e) => warn!(chart = %spec.title, error = %e, "chart omitted from report"),
        }
        self
    }

    pub fn table(&mut self, table: Table) -> &mut Self {
        self.blocks.push(Block::Table(table));
        self
    }

    pub fn page_break(&mut self) -> &mut Self {
        self.blocks.push(Block::PageBreak);
        self
    }

    /// `<Stem>_<YYYY-MM-DD_HH-MM-SS>.pdf`
    pub fn filename(&self) -> String {
        format!(
            "{}_{}.pdf",
            self.kind.stem(),
            self.generated_at.format("%Y-%m-%d_%H-%M-%S")
        )
    }

    pub fn chart_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Chart { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charts::{ChartError, ChartKind, Rgb, Series};
    use chrono::TimeZone;

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _: &ChartSpec, _: (u32, u32)) -> Result<RasterImage, ChartError> {
            Err(ChartError::Backend("no fonts".into()))
        }
    }

    struct BlankRenderer;

    impl ChartRenderer for BlankRenderer {
        fn render(&self, _: &ChartSpec, size: (u32, u32)) -> Result<RasterImage, ChartError> {
            Ok(RasterImage::blank(size.0, size.1))
        }
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 20, 14, 3, 7).unwrap()
    }

    fn spec() -> ChartSpec {
        ChartSpec::new("Cash Flow", ChartKind::Line, vec!["2024-01".into()])
            .with_series(Series::new("Total", vec![1.0], Rgb::BLUE))
    }

    #[test]
    fn filename_uses_stem_and_timestamp() {
        let report = Report::new(ReportType::Financial, at());
        assert_eq!(report.filename(), "Financial_Report_2025-05-20_14-03-07.pdf");

        let report = Report::new(ReportType::OperationalExpenses, at());
        assert!(report.filename().starts_with("Operational_Expenses_Report_"));
    }

    #[test]
    fn starts_with_a_header() {
        let report = Report::new(ReportType::Sales, at());
        match &report.blocks[0] {
            Block::Header { title, subtitle } => {
                assert_eq!(title, "Sales Report");
                assert!(subtitle.contains("2025-05-20 14:03:07"));
            }
            other => panic!("unexpected first block {other:?}"),
        }
    }

    #[test]
    fn failed_charts_are_omitted() {
        let mut report = Report::new(ReportType::Financial, at());
        report
            .chart(&FailingRenderer, &spec())
            .chart(&BlankRenderer, &spec());
        assert_eq!(report.chart_count(), 1);
    }

    #[test]
    fn empty_card_lists_add_nothing() {
        let mut report = Report::new(ReportType::Sales, at());
        report.cards(&[]);
        assert_eq!(report.blocks.len(), 1);
    }
}
