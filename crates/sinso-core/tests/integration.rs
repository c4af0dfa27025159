//! Integration tests for the parse_pdf() → store → calculator pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without
//! invoking pdftotext, so these tests run without poppler-utils.

use rust_decimal_macros::dec;
use sinso_core::calc::{RiskLevel, Severity};
use sinso_core::error::SinsoError;
use sinso_core::extraction::json::JsonDocumentExtractor;
use sinso_core::extraction::{Document, PageContent, PdfExtractor, Table};
use sinso_core::model::{CardCategory, DeductionCategory, Flag, OtherIncomeKind};
use sinso_core::parse_pdf;
use sinso_core::rules::builtin::load_preset;
use sinso_core::store::{MemoryStore, TaxpayerStore};
use sinso_core::Calculator;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SinsoError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn page(number: usize, text: &str, tables: Vec<Table>) -> PageContent {
    PageContent {
        page_number: number,
        text: text.to_string(),
        tables,
    }
}

fn row(cells: &[(usize, &str)], width: usize) -> Vec<Option<String>> {
    let mut row = vec![None; width];
    for &(i, v) in cells {
        row[i] = Some(v.to_string());
    }
    row
}

const PAGE1: &str = "\
2024년 귀속 종합소득세 신고도움서비스
성명 김*수 생년월일 78.11.02
안내유형 일반(기준경비율)
기장의무 간편장부대상자
추계시 적용경비율 기준경비율
종교인기타 소득유무 : X
해당여부 O X O X X X
중간예납세액 350,000원
원천징수세액(인적용역 사업소득) 120,000원
국민연금보험료 2,400,000원
소기업소상공인공제부금(노란우산공제) 3,000,000원
연금계좌세액공제 660,000원
";

const PAGE2: &str = "\
가산세 항목
(세금)계산서관련 보고불성실 미(지연) 제출금액 1,500,000 원
현금영수증미발급 미발급 금액 230,000 원
무과소신고금액 0 원
";

const PAGE3: &str = "\
최근 3년간 종합소득세 신고상황
구분 2021귀속 2022귀속 2023귀속
종합소득금액 12,000 15,500 9,800
소득공제 3,000 3,200 3,400
과세표준 9,000 12,300 6,400
세율 6.0 % 6.0 % 6.0 %
산출세액 540 738 384
공제·감면세액 70 70 70
결정세액 470 668 314
실효세율 3.9 % 4.3 % 3.2 %
";

const PAGE4: &str = "\
최근 3년간 신고소득률
상 호 가나상회 사업자 등록번호 123-45-67890
구분 2021년 2022년 2023년
수입금액 80,000 95,000 110,000
필요경비 76,000 90,000 106,500
소득금액 4,000 5,000 3,500
소득률(당해업체) 5.00% 5.26% 3.18%
2023년 매출액 대비 판매비와 관리비 비율
811 복리후생비 1,200 1.09 2.31
812 여비교통비 800 0.73 1.10
";

const PAGE5: &str = "\
2023년 사업용 신용카드 사용현황
건수 120 4 2 10 1 0
금액 8,500,000 150,000 90,000 3,000,000 45,000 0
";

fn page1_tables() -> Vec<Table> {
    let header = row(&[(0, "사업자등록번호"), (2, "상호"), (14, "수입금액")], 21);
    let main = row(
        &[
            (0, "123-45-67890"),
            (2, "가나상회"),
            (4, "40 부가가치세"),
            (8, "552101"),
            (9, "단독"),
            (10, "간편"),
            (12, "기준"),
            (14, "100,000,000"),
            (16, "70.0"),
            (18, "65.2"),
            (19, "85.0"),
            (20, "80.1"),
        ],
        21,
    );
    let side = row(
        &[
            (0, "987-65-43210"),
            (2, "다라서점"),
            (4, "30 면세사업자"),
            (12, "단순"),
            (14, "900,000,000"),
            (16, "10.0"),
            (19, "20.0"),
        ],
        21,
    );
    let payment = row(
        &[
            (0, "납부기한 직권연장 여부"),
            (5, "해당없음"),
            (12, "ARS 개별인증번호"),
            (17, "4821"),
        ],
        18,
    );
    vec![vec![header, main, side], vec![payment]]
}

fn notice_pages() -> Vec<PageContent> {
    vec![
        page(1, PAGE1, page1_tables()),
        page(2, PAGE2, vec![]),
        page(3, PAGE3, vec![]),
        page(4, PAGE4, vec![]),
        page(5, PAGE5, vec![]),
    ]
}

fn mock() -> MockExtractor {
    MockExtractor {
        pages: notice_pages(),
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------
#[test]
fn synthetic_notice_round_trips_documented_values() {
    let parsed = parse_pdf(&[], &mock()).unwrap();
    assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
    let g = &parsed.records;

    // Page 1
    assert_eq!(g.taxpayer.tax_year, Some(2024));
    assert_eq!(g.taxpayer.name.as_deref(), Some("김*수"));
    assert_eq!(g.taxpayer.birth_date.as_deref(), Some("78.11.02"));
    assert_eq!(g.taxpayer.guide_type.as_deref(), Some("일반(기준경비율)"));
    assert_eq!(g.taxpayer.payment_extension.as_deref(), Some("해당없음"));
    assert_eq!(g.taxpayer.ars_auth_number.as_deref(), Some("4821"));
    assert_eq!(g.taxpayer.religion_income, Flag::No);

    assert_eq!(g.businesses.len(), 2);
    assert_eq!(g.businesses[0].business_reg_no, "123-45-67890");
    assert_eq!(g.businesses[0].revenue, Some(100_000_000));
    assert_eq!(g.businesses[0].std_expense_rate_general, Some(dec!(70.0)));
    assert_eq!(g.businesses[1].expense_rate_type.as_deref(), Some("단순"));

    assert_eq!(g.other_incomes[0].income_type, OtherIncomeKind::Interest);
    assert!(g.other_incomes[0].has_data.is_yes());
    assert!(g.other_incomes[2].has_data.is_yes());
    assert_eq!(g.other_incomes[1].has_data, Flag::No);

    let prepaid: i64 = g
        .deductions_in(DeductionCategory::Prepaid)
        .map(|d| d.amount)
        .sum();
    assert_eq!(prepaid, 470_000);
    assert_eq!(g.deductions[3].amount, 0);

    // Page 2: three probes plus the fixed items
    assert_eq!(g.penalty_taxes.len(), 6);
    assert_eq!(g.penalty_taxes[0].amount, Some(1_500_000));
    assert_eq!(g.penalty_taxes[2].penalty_type, "사업장현황신고불성실");
    assert_eq!(g.penalty_taxes[5].penalty_type, "사업용계좌미신고");

    // Page 3
    assert_eq!(g.tax_history.len(), 3);
    assert_eq!(g.tax_history[2].attribution_year, 2023);
    assert_eq!(g.tax_history[2].determined_tax, Some(314));
    assert_eq!(g.tax_history[1].effective_tax_rate, Some(dec!(4.3)));

    // Page 4
    assert_eq!(g.income_rate_history.len(), 3);
    assert_eq!(g.income_rate_history[2].income_rate, Some(dec!(3.18)));
    assert_eq!(
        g.income_rate_history[0].business_name.as_deref(),
        Some("가나상회")
    );
    assert_eq!(g.sg_expenses.len(), 2);
    assert_eq!(g.sg_expenses[1].account_name, "여비교통비");
    assert_eq!(g.sg_expenses[1].analysis_year, Some(2023));

    // Page 5
    let total = g.card_usage(CardCategory::Total).unwrap();
    assert_eq!(total.count, Some(120));
    assert_eq!(total.amount, Some(8_500_000));
    assert_eq!(total.usage_year, Some(2023));
}

#[test]
fn every_registration_number_is_complete() {
    let parsed = parse_pdf(&[], &mock()).unwrap();
    let re = regex::Regex::new(r"^\d{3}-\d{2}-\d{5}$").unwrap();
    assert!(parsed
        .records
        .businesses
        .iter()
        .all(|b| re.is_match(&b.business_reg_no)));
}

#[test]
fn no_pages_is_an_error() {
    let extractor = MockExtractor { pages: vec![] };
    assert!(matches!(
        parse_pdf(&[], &extractor),
        Err(SinsoError::Extraction(_))
    ));
}

#[test]
fn json_dump_matches_direct_pages() {
    let json = serde_json::to_vec(&Document::new(notice_pages())).unwrap();
    let from_json = parse_pdf(&json, &JsonDocumentExtractor::new()).unwrap();
    let direct = parse_pdf(&[], &mock()).unwrap();
    assert_eq!(from_json.records, direct.records);
}

#[test]
fn two_page_notice_keeps_fixed_catalogs() {
    let mut pages = notice_pages();
    pages.truncate(2);
    let parsed = parse_pdf(&[], &MockExtractor { pages }).unwrap();
    let g = &parsed.records;

    assert!(g.tax_history.is_empty());
    assert!(g.income_rate_history.is_empty());
    assert_eq!(g.credit_card_usage.len(), 6);
    assert!(g.credit_card_usage.iter().all(|r| r.amount.is_none()));
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].page_number, 3);
}

// ---------------------------------------------------------------------------
// Calculation and analysis
// ---------------------------------------------------------------------------
fn stored_notice() -> (MemoryStore, u64) {
    let parsed = parse_pdf(&[], &mock()).unwrap();
    let mut store = MemoryStore::new();
    let id = store.insert(parsed.records, Some("notice.pdf".into()));
    (store, id)
}

#[test]
fn calculate_end_to_end() {
    let (store, id) = stored_notice();
    let calc = Calculator::new(load_preset("2024").unwrap());
    let r = calc.calculate(&store, id).unwrap();

    // The VAT-registered business wins over the larger tax-exempt one.
    assert_eq!(r.revenue, 100_000_000);
    assert_eq!(r.business_income, 30_000_000);
    assert_eq!(r.income_deduction, 5_400_000);
    assert_eq!(r.taxable_income, 24_600_000);
    assert_eq!(r.tax_rate, dec!(15));
    assert_eq!(r.calculated_tax, 2_430_000);
    assert_eq!(r.tax_credit, 660_000);
    assert_eq!(r.determined_tax, 1_770_000);
    assert_eq!(r.prepaid_tax, 470_000);
    assert_eq!(r.final_tax, 1_300_000);
    assert_eq!(r.steps.last().unwrap().value, Some(1_300_000));
}

#[test]
fn analyze_end_to_end() {
    let (store, id) = stored_notice();
    let calc = Calculator::new(load_preset("2024").unwrap());
    let a = calc.analyze(&store, id).unwrap();

    let titles: Vec<&str> = a.comments.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "소득률 저조",
            "매출 증가 추세",
            "업무무관 신용카드 사용 과다",
            "개인적 치료비 사용",
            "국민연금 공제 적용",
            "노란우산공제 적용",
        ]
    );
    assert_eq!(a.risk_score, 4);
    assert_eq!(a.risk_level, RiskLevel::High);
    assert_eq!(a.comments[0].severity, Severity::Warning);
}

#[test]
fn replace_recalculates_from_new_records() {
    let (mut store, id) = stored_notice();
    let mut records = store.load(id).unwrap().unwrap().records;
    records.businesses.clear();
    store.replace(id, records).unwrap();

    let calc = Calculator::new(load_preset("2024").unwrap());
    let r = calc.calculate(&store, id).unwrap();
    assert_eq!(r.revenue, 0);
    assert_eq!(r.expense_rate_type, "-");
    assert_eq!(r.final_tax, -470_000);
}

#[test]
fn unknown_taxpayer_is_not_found() {
    let (store, id) = stored_notice();
    let calc = Calculator::new(load_preset("2024").unwrap());
    assert!(matches!(
        calc.calculate(&store, id + 1),
        Err(SinsoError::TaxpayerNotFound(_))
    ));
    assert!(matches!(
        calc.analyze(&store, id + 1),
        Err(SinsoError::TaxpayerNotFound(_))
    ));
}
