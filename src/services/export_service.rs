use rust_xlsxwriter::*;

use crate::analytics::funnel::FunnelAnalytics;
use crate::analytics::kpi::KpiMetrics;
use crate::analytics::source::SourcePerformance;
use crate::analytics::time_to_fill::TimeToFill;
use crate::error::Result;

/// Renders the analytics aggregates into a styled XLSX workbook. A pure
/// formatter: the numbers come in fully computed and are written as is.
pub struct ExportService;

impl ExportService {
    pub fn generate_pipeline_report_xlsx(
        kpi: &KpiMetrics,
        funnel: &FunnelAnalytics,
        time_to_fill: &TimeToFill,
        sources: &[SourcePerformance],
    ) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        let header_bg = Color::RGB(0x0F172A); // Slate 900
        let header_text = Color::White;
        let alt_row = Color::RGB(0xF8FAFC); // Slate 50
        let over_target = Color::RGB(0xEF4444); // Red

        let header_format = Format::new()
            .set_bold()
            .set_background_color(header_bg)
            .set_font_color(header_text);
        let label_format = Format::new().set_bold();
        let alt_format = Format::new().set_background_color(alt_row);
        let flagged_format = Format::new().set_font_color(over_target).set_bold();

        // Overview sheet
        let sheet = workbook.add_worksheet();
        sheet.set_name("Overview")?;
        sheet.set_column_width(0, 28)?;

        let overview: [(&str, f64); 8] = [
            ("Active roles", kpi.active_roles as f64),
            ("Active candidates", kpi.active_candidates as f64),
            ("Interviews today", kpi.interviews_today as f64),
            ("Interviews this week", kpi.interviews_this_week as f64),
            ("Candidates in offer", kpi.candidates_in_offer as f64),
            ("Hired", kpi.hired_candidates as f64),
            ("Avg time to fill (days)", kpi.avg_time_to_fill),
            ("Offer acceptance rate (%)", kpi.offer_acceptance_rate),
        ];
        sheet.write_with_format(0, 0, "Metric", &header_format)?;
        sheet.write_with_format(0, 1, "Value", &header_format)?;
        for (i, (label, value)) in overview.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_with_format(row, 0, *label, &label_format)?;
            if i % 2 == 1 {
                sheet.write_with_format(row, 1, *value, &alt_format)?;
            } else {
                sheet.write(row, 1, *value)?;
            }
        }

        // Funnel sheet
        let sheet = workbook.add_worksheet();
        sheet.set_name("Funnel")?;
        sheet.set_column_width(0, 22)?;
        for (col, title) in ["Stage", "Candidates", "% of total", "Conversion to next (%)", "Avg days in stage"]
            .iter()
            .enumerate()
        {
            sheet.write_with_format(0, col as u16, *title, &header_format)?;
        }
        for (i, stage) in funnel.stages.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write(row, 0, &stage.stage_name)?;
            sheet.write(row, 1, stage.count as f64)?;
            sheet.write(row, 2, stage.percentage)?;
            match stage.conversion_to_next {
                Some(rate) => sheet.write(row, 3, rate)?,
                None => sheet.write(row, 3, "-")?,
            };
            sheet.write(row, 4, stage.avg_days_in_stage)?;
        }
        let summary_row = (funnel.stages.len() + 2) as u32;
        sheet.write_with_format(summary_row, 0, "Total applicants", &label_format)?;
        sheet.write(summary_row, 1, funnel.total_applicants as f64)?;
        sheet.write_with_format(summary_row + 1, 0, "Hired", &label_format)?;
        sheet.write(summary_row + 1, 1, funnel.total_hired as f64)?;
        sheet.write_with_format(summary_row + 2, 0, "Overall conversion (%)", &label_format)?;
        sheet.write(summary_row + 2, 1, funnel.overall_conversion_rate)?;

        // Time to fill sheet
        let sheet = workbook.add_worksheet();
        sheet.set_name("Time to fill")?;
        sheet.set_column_width(0, 30)?;
        for (col, title) in ["Role", "Avg days", "Hires", "Over target"].iter().enumerate() {
            sheet.write_with_format(0, col as u16, *title, &header_format)?;
        }
        for (i, job) in time_to_fill.by_job.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write(row, 0, &job.job_title)?;
            sheet.write(row, 1, job.average_days)?;
            sheet.write(row, 2, job.hires as f64)?;
            if job.is_over_target {
                sheet.write_with_format(row, 3, "yes", &flagged_format)?;
            } else {
                sheet.write(row, 3, "no")?;
            }
        }

        // Sources sheet
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sources")?;
        sheet.set_column_width(0, 24)?;
        for (col, title) in ["Source", "Candidates", "% of total", "Hires", "Hire rate (%)", "Avg days to hire"]
            .iter()
            .enumerate()
        {
            sheet.write_with_format(0, col as u16, *title, &header_format)?;
        }
        for (i, source) in sources.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write(row, 0, &source.source)?;
            sheet.write(row, 1, source.count as f64)?;
            sheet.write(row, 2, source.percentage)?;
            sheet.write(row, 3, source.hires as f64)?;
            sheet.write(row, 4, source.hire_rate)?;
            sheet.write(row, 5, source.avg_days_to_hire)?;
        }

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}
