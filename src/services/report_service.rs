//! Report service - employee reports grouped by company, rendered as
//! PDF or Excel.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Company;
use crate::errors::{AppError, AppResult};
use crate::infra::{CompanyRepository, EmployeeRepository};

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Employee report grouped by company, as a PDF document
    async fn employee_report_pdf(&self) -> AppResult<Vec<u8>>;

    /// Employee report grouped by company, as an Excel workbook
    async fn employee_report_excel(&self) -> AppResult<Vec<u8>>;
}

/// One employee line in the report
struct ReportRow {
    full_name: String,
    position: String,
    projects: String,
}

/// A company together with its employee lines
struct CompanySection {
    company: Company,
    rows: Vec<ReportRow>,
}

/// Concrete implementation of ReportService.
pub struct ReportBuilder {
    companies: Arc<dyn CompanyRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl ReportBuilder {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        employees: Arc<dyn EmployeeRepository>,
    ) -> Self {
        Self {
            companies,
            employees,
        }
    }

    /// Collect every company with its employees and their project titles
    async fn collect_sections(&self) -> AppResult<Vec<CompanySection>> {
        let mut sections = Vec::new();

        for company in self.companies.list_all().await? {
            let mut rows = Vec::new();
            for employee in self.companies.employees_of(company.id).await? {
                let projects = self.employees.projects_of(employee.id).await?;
                let project_list = if projects.is_empty() {
                    "No projects assigned".to_string()
                } else {
                    projects
                        .iter()
                        .map(|p| p.title.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                rows.push(ReportRow {
                    full_name: employee.full_name,
                    position: employee.position,
                    projects: project_list,
                });
            }
            sections.push(CompanySection { company, rows });
        }

        Ok(sections)
    }
}

#[async_trait]
impl ReportService for ReportBuilder {
    async fn employee_report_pdf(&self) -> AppResult<Vec<u8>> {
        let sections = self.collect_sections().await?;
        render_pdf(&sections)
    }

    async fn employee_report_excel(&self) -> AppResult<Vec<u8>> {
        let sections = self.collect_sections().await?;
        render_excel(&sections)
    }
}

fn render_pdf(sections: &[CompanySection]) -> AppResult<Vec<u8>> {
    use printpdf::{BuiltinFont, Mm, PdfDocument};

    const PAGE_WIDTH: f32 = 210.0;
    const PAGE_HEIGHT: f32 = 297.0;
    const MARGIN_LEFT: f32 = 20.0;
    const TOP: f32 = 280.0;
    const BOTTOM: f32 = 20.0;
    const LINE_STEP: f32 = 7.0;

    let (doc, first_page, first_layer) =
        PdfDocument::new("Employee Report", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::internal(format!("PDF font load failed: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::internal(format!("PDF font load failed: {}", e)))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = TOP;

    // Starts a new page when the cursor reaches the bottom margin
    macro_rules! advance {
        () => {
            y -= LINE_STEP;
            if y < BOTTOM {
                let (page, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                layer = doc.get_page(page).get_layer(layer_index);
                y = TOP;
            }
        };
    }

    layer.use_text("Employee Report", 24.0, Mm(MARGIN_LEFT), Mm(y), &bold);
    advance!();
    advance!();

    for section in sections {
        layer.use_text(
            format!("Company: {}", section.company.name),
            16.0,
            Mm(MARGIN_LEFT),
            Mm(y),
            &bold,
        );
        advance!();

        if section.rows.is_empty() {
            layer.use_text("No employees assigned.", 11.0, Mm(MARGIN_LEFT), Mm(y), &regular);
            advance!();
        } else {
            layer.use_text("Employee Name", 11.0, Mm(MARGIN_LEFT), Mm(y), &bold);
            layer.use_text("Position", 11.0, Mm(80.0), Mm(y), &bold);
            layer.use_text("Projects", 11.0, Mm(120.0), Mm(y), &bold);
            advance!();

            for row in &section.rows {
                layer.use_text(row.full_name.as_str(), 10.0, Mm(MARGIN_LEFT), Mm(y), &regular);
                layer.use_text(row.position.as_str(), 10.0, Mm(80.0), Mm(y), &regular);
                layer.use_text(row.projects.as_str(), 10.0, Mm(120.0), Mm(y), &regular);
                advance!();
            }
        }
        advance!();
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::internal(format!("PDF generation failed: {}", e)))
}

fn render_excel(sections: &[CompanySection]) -> AppResult<Vec<u8>> {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Employee Report")
        .map_err(|e| AppError::internal(format!("Excel generation failed: {}", e)))?;

    let mut write = |row: u32, col: u16, text: &str, header: bool| {
        let result = if header {
            worksheet.write_string_with_format(row, col, text, &bold)
        } else {
            worksheet.write_string(row, col, text)
        };
        result
            .map(|_| ())
            .map_err(|e| AppError::internal(format!("Excel generation failed: {}", e)))
    };

    let mut row: u32 = 0;
    write(row, 0, "Company Employee Report", true)?;
    row += 2;

    for section in sections {
        write(row, 0, &format!("Company: {}", section.company.name), true)?;
        row += 1;

        if section.rows.is_empty() {
            write(row, 0, "No employees assigned.", false)?;
            row += 1;
        } else {
            write(row, 0, "Employee Name", true)?;
            write(row, 1, "Position", true)?;
            write(row, 2, "Projects", true)?;
            row += 1;

            for line in &section.rows {
                write(row, 0, &line.full_name, false)?;
                write(row, 1, &line.position, false)?;
                write(row, 2, &line.projects, false)?;
                row += 1;
            }
        }
        row += 1;
    }

    worksheet
        .set_column_width(0, 30)
        .and_then(|ws| ws.set_column_width(1, 20))
        .and_then(|ws| ws.set_column_width(2, 50))
        .map_err(|e| AppError::internal(format!("Excel generation failed: {}", e)))?;

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::internal(format!("Excel generation failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, Project};
    use crate::infra::{MockCompanyRepository, MockEmployeeRepository};

    fn builder_with_one_company() -> ReportBuilder {
        let mut companies = MockCompanyRepository::new();
        companies.expect_list_all().returning(|| {
            Ok(vec![Company {
                id: 1,
                name: "Acme".to_string(),
            }])
        });
        companies.expect_employees_of().returning(|_| {
            Ok(vec![Employee {
                id: 7,
                full_name: "Alice Smith".to_string(),
                position: "Engineer".to_string(),
                profile_picture_path: None,
            }])
        });

        let mut employees = MockEmployeeRepository::new();
        employees.expect_projects_of().returning(|_| {
            Ok(vec![Project {
                id: 2,
                title: "Migration".to_string(),
                duration_days: 30,
            }])
        });

        ReportBuilder::new(Arc::new(companies), Arc::new(employees))
    }

    #[tokio::test]
    async fn test_pdf_report_is_nonempty() {
        let report = builder_with_one_company();
        let bytes = report.employee_report_pdf().await.unwrap();
        assert!(!bytes.is_empty());
        // PDF magic number
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_excel_report_is_nonempty() {
        let report = builder_with_one_company();
        let bytes = report.employee_report_excel().await.unwrap();
        assert!(!bytes.is_empty());
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }
}
