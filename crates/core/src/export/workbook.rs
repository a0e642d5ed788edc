//! `.xlsx` rendering of a quotation.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use super::document::{CompanyProfile, QuotationDocument};
use super::error::ExportError;

/// MIME type of the rendered workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Quotation";
const PAPER_A4: u8 = 9;
const LAST_COL: u16 = 5;
const COLUMN_WIDTHS: [u16; 6] = [8, 50, 12, 15, 15, 18];
const ITEM_HEADERS: [&str; 6] = ["S.No", "Scope of Work", "Quantity", "Rate", "VAT Rate", "Sub-Total"];
const TERMS_ROWS: u32 = 6;
const DEFAULT_PREPARER: &str = "System User";

const NAVY: u32 = 0x0000_2060;
const DARK_GREY: u32 = 0x0040_4040;
const LIGHT_GREY: u32 = 0x00E7_E6E6;
const PALE_GREY: u32 = 0x00F2_F2F2;
const BLUE: u32 = 0x0044_72C4;
const WHITE: u32 = 0x00FF_FFFF;

/// Cell formats used by the quotation sheet.
struct Styles {
    company: Format,
    company_details: Format,
    title: Format,
    label: Format,
    plain: Format,
    table_header: Format,
    cell_center: Format,
    cell_scope: Format,
    cell_money: Format,
    total_label: Format,
    total_money: Format,
    grand_label: Format,
    grand_money: Format,
    terms_header: Format,
    terms: Format,
    preparer: Format,
    signature: Format,
}

impl Styles {
    fn new(currency: &str) -> Self {
        let money = format!("#,##0.00 \"{currency}\"");
        let bordered = Format::new().set_border(FormatBorder::Thin).set_align(FormatAlign::Top);

        Self {
            company: Format::new()
                .set_bold()
                .set_font_size(20)
                .set_font_color(Color::RGB(NAVY))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            company_details: Format::new()
                .set_font_size(10)
                .set_font_color(Color::RGB(DARK_GREY))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_background_color(Color::RGB(LIGHT_GREY))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            label: Format::new().set_bold(),
            plain: Format::new(),
            table_header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(WHITE))
                .set_background_color(Color::RGB(BLUE))
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            cell_center: bordered.clone().set_align(FormatAlign::Center),
            cell_scope: bordered.clone().set_align(FormatAlign::Left).set_text_wrap(),
            cell_money: bordered.set_align(FormatAlign::Right).set_num_format(&money),
            total_label: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_align(FormatAlign::Right),
            total_money: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_align(FormatAlign::Right)
                .set_background_color(Color::RGB(PALE_GREY))
                .set_num_format(&money),
            grand_label: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_font_color(Color::RGB(WHITE))
                .set_background_color(Color::RGB(BLUE))
                .set_align(FormatAlign::Right),
            grand_money: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_font_color(Color::RGB(WHITE))
                .set_background_color(Color::RGB(BLUE))
                .set_align(FormatAlign::Right)
                .set_num_format(&money),
            terms_header: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_background_color(Color::RGB(LIGHT_GREY)),
            terms: Format::new()
                .set_font_size(10)
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::Top)
                .set_text_wrap(),
            preparer: Format::new()
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::Bottom)
                .set_border_bottom(FormatBorder::Thin),
            signature: Format::new().set_border_bottom(FormatBorder::Thin),
        }
    }
}

/// Renders a quotation as an `.xlsx` workbook.
///
/// Layout: company header, title, quotation and customer details side by
/// side, the line item table, totals, terms (when present) and the
/// signature block. A4 portrait, one page wide.
///
/// # Errors
///
/// Returns `ExportError` if the writer fails or an amount cannot be
/// represented as a spreadsheet number.
pub fn render_quotation(
    doc: &QuotationDocument,
    company: &CompanyProfile,
) -> Result<Vec<u8>, ExportError> {
    let styles = Styles::new(&company.currency);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.set_name(SHEET_NAME)?;
    sheet.set_paper_size(PAPER_A4);
    sheet.set_portrait();
    sheet.set_print_fit_to_pages(1, 0);
    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        sheet.set_column_width(col, width)?;
    }

    let row = write_company_header(sheet, company, &styles)?;
    let row = write_details(sheet, doc, company, &styles, row)?;
    let row = write_items(sheet, doc, &styles, row)?;
    let row = write_totals(sheet, doc, &styles, row)?;
    let row = write_terms(sheet, doc, &styles, row)?;
    write_signatures(sheet, doc, &styles, row)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_company_header(
    sheet: &mut Worksheet,
    company: &CompanyProfile,
    styles: &Styles,
) -> Result<u32, ExportError> {
    sheet.merge_range(0, 0, 0, LAST_COL, &company.name, &styles.company)?;
    sheet.set_row_height(0, 30)?;

    let details = format!(
        "{} | Phone: {} | Email: {}",
        company.address, company.phone, company.email
    );
    sheet.merge_range(1, 0, 1, LAST_COL, &details, &styles.company_details)?;

    sheet.merge_range(3, 0, 3, LAST_COL, "QUOTATION", &styles.title)?;
    sheet.set_row_height(3, 25)?;

    Ok(5)
}

fn write_details(
    sheet: &mut Worksheet,
    doc: &QuotationDocument,
    company: &CompanyProfile,
    styles: &Styles,
    start: u32,
) -> Result<u32, ExportError> {
    let date = doc.date_label(company.utc_offset);
    let mut left = vec![
        ("Quotation No:", doc.quotation_number.as_str()),
        ("Date:", date.as_str()),
        ("Project:", doc.project_name.as_str()),
    ];
    if let Some(site) = doc.site_location.as_deref() {
        left.push(("Site Location:", site));
    }

    let customer = &doc.customer;
    let mut right = vec![("Customer:", customer.company_name.as_str())];
    for (label, value) in [
        ("Attn:", &customer.contact_person),
        ("Phone:", &customer.phone),
        ("Email:", &customer.email),
    ] {
        if let Some(value) = value.as_deref() {
            right.push((label, value));
        }
    }

    let mut row = start;
    for (label, value) in &left {
        sheet.merge_range(row, 0, row, 1, label, &styles.label)?;
        sheet.merge_range(row, 2, row, 3, value, &styles.plain)?;
        row += 1;
    }
    let left_end = row;

    let mut row = start;
    for (label, value) in &right {
        sheet.write_string_with_format(row, 4, *label, &styles.label)?;
        sheet.write_string_with_format(row, 5, *value, &styles.plain)?;
        row += 1;
    }

    Ok(left_end.max(row) + 2)
}

fn write_items(
    sheet: &mut Worksheet,
    doc: &QuotationDocument,
    styles: &Styles,
    start: u32,
) -> Result<u32, ExportError> {
    for (col, title) in (0u16..).zip(ITEM_HEADERS) {
        sheet.write_string_with_format(start, col, title, &styles.table_header)?;
    }
    sheet.set_row_height(start, 20)?;

    let mut row = start + 1;
    for (serial, item) in (1u32..).zip(&doc.items) {
        let scope = item.scope_text();

        sheet.write_number_with_format(row, 0, f64::from(serial), &styles.cell_center)?;
        sheet.write_string_with_format(row, 1, &scope, &styles.cell_scope)?;
        sheet.write_number_with_format(row, 2, amount(item.quantity)?, &styles.cell_center)?;
        sheet.write_number_with_format(row, 3, amount(item.rate)?, &styles.cell_money)?;
        sheet.write_number_with_format(row, 4, amount(item.vat_rate)?, &styles.cell_money)?;
        sheet.write_number_with_format(row, 5, amount(item.sub_total)?, &styles.cell_money)?;
        sheet.set_row_height(row, scope_row_height(&scope))?;

        row += 1;
    }

    Ok(row + 1)
}

fn write_totals(
    sheet: &mut Worksheet,
    doc: &QuotationDocument,
    styles: &Styles,
    start: u32,
) -> Result<u32, ExportError> {
    let vat_label = doc.vat_label();
    let rows = [
        ("Subtotal:", doc.totals.subtotal, &styles.total_label, &styles.total_money),
        (vat_label.as_str(), doc.totals.vat_amount, &styles.total_label, &styles.total_money),
        ("GRAND TOTAL:", doc.totals.total, &styles.grand_label, &styles.grand_money),
    ];

    let mut row = start;
    for (label, value, label_format, value_format) in rows {
        sheet.merge_range(row, 0, row, LAST_COL - 1, label, label_format)?;
        sheet.write_number_with_format(row, LAST_COL, amount(value)?, value_format)?;
        row += 1;
    }

    Ok(row + 2)
}

fn write_terms(
    sheet: &mut Worksheet,
    doc: &QuotationDocument,
    styles: &Styles,
    start: u32,
) -> Result<u32, ExportError> {
    let Some(terms) = doc.terms.as_deref().filter(|t| !t.trim().is_empty()) else {
        return Ok(start + 2);
    };

    sheet.merge_range(start, 0, start, LAST_COL, "TERMS & CONDITIONS:", &styles.terms_header)?;
    let body = start + 1;
    sheet.merge_range(body, 0, body + TERMS_ROWS - 1, LAST_COL, terms, &styles.terms)?;

    Ok(body + TERMS_ROWS + 2)
}

fn write_signatures(
    sheet: &mut Worksheet,
    doc: &QuotationDocument,
    styles: &Styles,
    start: u32,
) -> Result<(), ExportError> {
    sheet.merge_range(start, 0, start, 2, "Prepared By:", &styles.label)?;
    sheet.merge_range(start, 3, start, LAST_COL, "Authorized Signature:", &styles.label)?;

    let line = start + 1;
    let preparer = doc.prepared_by.as_deref().unwrap_or(DEFAULT_PREPARER);
    sheet.merge_range(line, 0, line + 2, 2, preparer, &styles.preparer)?;
    sheet.merge_range(line, 3, line + 2, LAST_COL, "", &styles.signature)?;

    Ok(())
}

fn amount(value: Decimal) -> Result<f64, ExportError> {
    value.to_f64().ok_or(ExportError::AmountOutOfRange(value))
}

/// Row height for a line item: 15 points per started 80 characters, at
/// least 30.
fn scope_row_height(scope: &str) -> u32 {
    let chars = u32::try_from(scope.chars().count()).unwrap_or(u32::MAX);
    chars.div_ceil(80).saturating_mul(15).max(30)
}

/// Attachment file name for a quotation download.
///
/// Non-alphanumeric characters in the project name become underscores.
#[must_use]
pub fn download_filename(quotation_number: &str, project_name: &str) -> String {
    let project: String = project_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("Quotation_{quotation_number}_{project}.xlsx")
}
