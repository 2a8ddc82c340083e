// ═══════════════════════════════════════════════════════════════════
// Model Tests — Period, wire formats, validation, filter normalization,
// settings, routes
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::bill::{Bill, BillFrequency, NewBill};
use finance_tracker_core::models::budget::{Budget, NewBudget};
use finance_tracker_core::models::category::{Category, EntryType, NewCategory};
use finance_tracker_core::models::dashboard::DashboardMetrics;
use finance_tracker_core::models::filter::{FilterCriteria, FilterEdit, RawFilterInput, TransactionQuery};
use finance_tracker_core::models::paging::PagedResult;
use finance_tracker_core::models::period::Period;
use finance_tracker_core::models::route::Route;
use finance_tracker_core::models::session::{LoginRequest, RegisterRequest, Session};
use finance_tracker_core::models::settings::ClientSettings;
use finance_tracker_core::models::transaction::{PaymentMethod, Transaction, TransactionDraft};
use finance_tracker_core::models::user::{ChangePasswordForm, UpdateProfile};
use finance_tracker_core::models::wire;
use uuid::Uuid;

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn period(month: u32, year: i32) -> Period {
    Period::new(month, year).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Period
// ═══════════════════════════════════════════════════════════════════

mod period_arithmetic {
    use super::*;

    #[test]
    fn december_plus_one_rolls_into_next_year() {
        assert_eq!(period(12, 2024).advance(1), period(1, 2025));
    }

    #[test]
    fn january_minus_one_rolls_into_previous_year() {
        assert_eq!(period(1, 2025).advance(-1), period(12, 2024));
    }

    #[test]
    fn large_negative_delta() {
        assert_eq!(period(3, 2025).advance(-27), period(12, 2022));
    }

    #[test]
    fn zero_delta_is_identity() {
        assert_eq!(period(7, 2025).advance(0), period(7, 2025));
    }

    #[test]
    fn forward_and_back_round_trip() {
        let start = period(5, 2025);
        assert_eq!(start.advance(19).advance(-19), start);
    }

    #[test]
    fn month_out_of_range_rejected() {
        assert!(matches!(Period::new(0, 2025), Err(CoreError::ValidationError(_))));
        assert!(matches!(Period::new(13, 2025), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn month_name_and_display() {
        let p = period(1, 2025);
        assert_eq!(p.month_name(), "January");
        assert_eq!(p.to_string(), "January 2025");
        assert_eq!(period(12, 2024).month_name(), "December");
    }

    #[test]
    fn containing_date() {
        assert_eq!(Period::containing(make_date(2025, 3, 31)), period(3, 2025));
    }

    #[test]
    fn current_or_future() {
        let today = make_date(2025, 6, 15);
        assert!(period(6, 2025).is_current_or_future(today));
        assert!(period(1, 2026).is_current_or_future(today));
        assert!(!period(5, 2025).is_current_or_future(today));
        assert!(!period(12, 2024).is_current_or_future(today));
    }

    #[test]
    fn query_pairs() {
        let pairs = period(2, 2025).query_pairs();
        assert_eq!(pairs[0], ("month", "2".to_string()));
        assert_eq!(pairs[1], ("year", "2025".to_string()));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wire formats
// ═══════════════════════════════════════════════════════════════════

mod wire_formats {
    use super::*;

    #[test]
    fn parse_date_variants() {
        let expected = Some(make_date(2025, 1, 5));
        assert_eq!(wire::parse_date("2025-01-05"), expected);
        assert_eq!(wire::parse_date("2025-01-05T00:00:00"), expected);
        assert_eq!(wire::parse_date("2025-01-05T10:30:00.123"), expected);
        assert_eq!(wire::parse_date("2025-01-05T00:00:00.000Z"), expected);
        assert_eq!(wire::parse_date(""), None);
        assert_eq!(wire::parse_date("yesterday"), None);
    }

    #[test]
    fn iso_format() {
        assert_eq!(wire::to_iso(make_date(2025, 3, 9)), "2025-03-09T00:00:00.000Z");
    }

    #[test]
    fn entry_type_from_code_or_name() {
        let from_code: EntryType = serde_json::from_str("1").unwrap();
        let from_name: EntryType = serde_json::from_str("\"Income\"").unwrap();
        let unknown_name: EntryType = serde_json::from_str("\"Transfer\"").unwrap();
        assert_eq!(from_code, EntryType::Income);
        assert_eq!(from_name, EntryType::Income);
        assert_eq!(unknown_name, EntryType::Expense);
        assert!(serde_json::from_str::<EntryType>("7").is_err());
    }

    #[test]
    fn entry_type_serializes_as_code() {
        assert_eq!(serde_json::to_string(&EntryType::Expense).unwrap(), "0");
        assert_eq!(serde_json::to_string(&EntryType::Income).unwrap(), "1");
    }

    #[test]
    fn payment_method_labels() {
        let upi: PaymentMethod = serde_json::from_str("\"UPI\"").unwrap();
        let bank: PaymentMethod = serde_json::from_str("3").unwrap();
        let unknown: PaymentMethod = serde_json::from_str("\"Cheque\"").unwrap();
        assert_eq!(upi, PaymentMethod::Upi);
        assert_eq!(bank, PaymentMethod::BankTransfer);
        assert_eq!(unknown, PaymentMethod::Cash);
        assert_eq!(PaymentMethod::Upi.to_string(), "UPI");
    }

    #[test]
    fn transaction_read_dto_without_category_id() {
        let json = r##"{
            "id": "6f1c1f5e-8d5a-4a43-9a57-3d6f0e0a8b11",
            "amount": 250.5,
            "categoryName": "Food",
            "categoryIcon": "restaurant",
            "categoryColor": "#EF4444",
            "description": "Lunch",
            "date": "2025-01-05T00:00:00",
            "type": "Expense",
            "merchant": "Cafe",
            "paymentMethod": "UPI",
            "isRecurring": false
        }"##;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.category_id, None);
        assert_eq!(tx.category_name, "Food");
        assert_eq!(tx.transaction_type, EntryType::Expense);
        assert_eq!(tx.payment_method, PaymentMethod::Upi);
        assert_eq!(tx.date, make_date(2025, 1, 5));
    }

    #[test]
    fn paged_result_shape() {
        let json = r#"{"items":[],"totalCount":42,"pageNumber":3,"pageSize":10,"totalPages":5}"#;
        let page: PagedResult<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_count, 42);
        assert_eq!(page.page_number, 3);
        assert_eq!(page.total_pages, 5);
    }

    #[test]
    fn dashboard_missing_fields_default() {
        let metrics: DashboardMetrics =
            serde_json::from_str(r#"{"totalSpentThisMonth": 1200.0}"#).unwrap();
        assert_eq!(metrics.total_spent_this_month, 1200.0);
        assert!(metrics.top_categories.is_empty());
        assert!(metrics.daily_trends.is_empty());
    }

    #[test]
    fn dashboard_rejects_non_finite_breakdown() {
        let mut metrics = DashboardMetrics::default();
        metrics.cashflow = f64::NAN;
        assert!(matches!(metrics.validate(), Err(CoreError::MalformedResponse(_))));
    }

    #[test]
    fn new_budget_body_is_camel_case() {
        let id = Uuid::new_v4();
        let body = serde_json::to_value(NewBudget::for_period(id, 5000.0, period(2, 2025))).unwrap();
        assert_eq!(body["categoryId"], id.to_string());
        assert_eq!(body["amount"], 5000.0);
        assert_eq!(body["month"], 2);
        assert_eq!(body["year"], 2025);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Entity validation
// ═══════════════════════════════════════════════════════════════════

mod categories {
    use super::*;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: "restaurant".into(),
            color: "#EF4444".into(),
            category_type: EntryType::Expense,
            user_id: None,
        }
    }

    #[test]
    fn defaults_are_not_deletable() {
        assert!(!category("Food").is_deletable());
        assert!(!category("Utilities").is_deletable());
        assert!(category("Groceries").is_deletable());
    }

    #[test]
    fn new_category_name_length() {
        let mut c = NewCategory {
            name: "A".into(),
            ..NewCategory::default()
        };
        assert!(c.validate().is_err());
        c.name = "Pets".into();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn new_category_requires_icon_and_color() {
        let c = NewCategory {
            name: "Pets".into(),
            icon: " ".into(),
            ..NewCategory::default()
        };
        assert!(c.validate().is_err());
    }
}

mod budgets {
    use super::*;

    fn budget(amount: f64, spent: f64) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            category_name: "Food".into(),
            category_color: String::new(),
            category_icon: String::new(),
            amount,
            spent,
            remaining: amount - spent,
            percentage: 0.0,
            month: 1,
            year: 2025,
        }
    }

    #[test]
    fn exhausted_at_equal_spend() {
        assert!(budget(100.0, 100.0).is_exhausted());
        assert!(budget(100.0, 150.0).is_exhausted());
        assert!(!budget(100.0, 99.99).is_exhausted());
    }

    #[test]
    fn amount_must_be_at_least_one() {
        let id = Uuid::new_v4();
        assert!(NewBudget::for_period(id, 0.5, period(1, 2025)).validate().is_err());
        assert!(NewBudget::for_period(id, 1.0, period(1, 2025)).validate().is_ok());
    }

    #[test]
    fn invalid_period_is_malformed() {
        let mut b = budget(100.0, 0.0);
        b.month = 13;
        assert!(matches!(b.validate(), Err(CoreError::MalformedResponse(_))));
    }
}

mod bills {
    use super::*;

    fn new_bill(name: &str, amount: f64) -> NewBill {
        NewBill {
            name: name.into(),
            amount,
            category_id: Uuid::new_v4(),
            due_date: make_date(2025, 2, 1),
            frequency: BillFrequency::Monthly,
            is_active: true,
            notes: Some("   ".into()),
        }
    }

    #[test]
    fn validated_trims_and_drops_blank_notes() {
        let bill = new_bill("  Rent  ", 1200.0).validated().unwrap();
        assert_eq!(bill.name, "Rent");
        assert_eq!(bill.notes, None);
    }

    #[test]
    fn amount_minimum() {
        assert!(new_bill("Rent", 0.0).validated().is_err());
        assert!(new_bill("Rent", 0.01).validated().is_ok());
    }

    #[test]
    fn name_required() {
        assert!(new_bill("   ", 10.0).validated().is_err());
    }

    #[test]
    fn upcoming_means_active_and_unpaid() {
        let mut bill = Bill {
            id: Uuid::new_v4(),
            name: "Internet".into(),
            amount: 50.0,
            category_id: Uuid::new_v4(),
            category_name: "Utilities".into(),
            category_icon: String::new(),
            category_color: String::new(),
            due_date: make_date(2025, 2, 1),
            frequency: BillFrequency::Monthly,
            is_active: true,
            is_paid: false,
            notes: None,
        };
        assert!(bill.is_upcoming());
        bill.is_paid = true;
        assert!(!bill.is_upcoming());
        bill.is_paid = false;
        bill.is_active = false;
        assert!(!bill.is_upcoming());
    }

    #[test]
    fn body_carries_iso_due_date() {
        let body = serde_json::to_value(new_bill("Rent", 10.0).validated().unwrap()).unwrap();
        assert_eq!(body["dueDate"], "2025-02-01T00:00:00.000Z");
        assert_eq!(body["frequency"], "Monthly");
        assert!(body.get("notes").is_none());
    }
}

mod transaction_draft {
    use super::*;

    fn filled() -> TransactionDraft {
        let mut draft = TransactionDraft::new(make_date(2025, 1, 5));
        draft.amount = Some(250.0);
        draft.category_id = Some(Uuid::new_v4());
        draft.description = "Lunch".into();
        draft
    }

    #[test]
    fn valid_draft_produces_form_fields() {
        let mut draft = filled();
        draft.payment_method = PaymentMethod::Card;
        let tx = draft.validate().unwrap();
        let fields = tx.form_fields();
        let get = |k: &str| fields.iter().find(|(key, _)| *key == k).map(|(_, v)| v.clone());
        assert_eq!(get("amount").as_deref(), Some("250"));
        assert_eq!(get("type").as_deref(), Some("0"));
        assert_eq!(get("paymentMethod").as_deref(), Some("1"));
        assert_eq!(get("date").as_deref(), Some("2025-01-05T00:00:00.000Z"));
        assert_eq!(get("isRecurring").as_deref(), Some("false"));
    }

    #[test]
    fn amount_minimum() {
        let mut draft = filled();
        draft.amount = Some(0.001);
        assert!(draft.validate().is_err());
        draft.amount = None;
        assert!(draft.validate().is_err());
    }

    #[test]
    fn category_description_and_date_required() {
        let mut draft = filled();
        draft.category_id = None;
        assert!(draft.validate().is_err());

        let mut draft = filled();
        draft.description = "  ".into();
        assert!(draft.validate().is_err());

        let mut draft = filled();
        draft.date = None;
        assert!(draft.validate().is_err());
    }

    #[test]
    fn switching_type_clears_category() {
        let mut draft = filled();
        draft.set_type(EntryType::Expense);
        assert!(draft.category_id.is_some());
        draft.set_type(EntryType::Income);
        assert_eq!(draft.category_id, None);
        assert_eq!(draft.transaction_type(), EntryType::Income);
    }
}

mod auth_and_profile {
    use super::*;

    #[test]
    fn login_requires_email_and_password() {
        let ok = LoginRequest {
            email: "asha@example.com".into(),
            password: "secret".into(),
        };
        assert!(ok.validate().is_ok());
        let bad_email = LoginRequest {
            email: "asha".into(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());
        let no_password = LoginRequest {
            password: String::new(),
            ..ok
        };
        assert!(no_password.validate().is_err());
    }

    #[test]
    fn register_password_length() {
        let mut req = RegisterRequest {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@example.com".into(),
            password: "12345".into(),
        };
        assert!(req.validate().is_err());
        req.password = "123456".into();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn session_names() {
        let session = Session {
            id: "1".into(),
            first_name: "asha".into(),
            last_name: "rao".into(),
            email: "asha@example.com".into(),
            token: "t".into(),
        };
        assert_eq!(session.display_name(), "asha rao");
        assert_eq!(session.initials(), "AR");
    }

    #[test]
    fn profile_requires_names() {
        let profile = UpdateProfile {
            first_name: String::new(),
            last_name: "Rao".into(),
            email: "asha@example.com".into(),
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn change_password_confirmation() {
        let mut form = ChangePasswordForm {
            current_password: "old-secret".into(),
            new_password: "new-secret".into(),
            confirm_password: "new-secrett".into(),
        };
        assert!(form.validate().is_err());
        form.confirm_password = "new-secret".into();
        let request = form.validate().unwrap();
        assert_eq!(request.new_password, "new-secret");

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("confirmPassword").is_none());
        assert_eq!(body["currentPassword"], "old-secret");
    }

    #[test]
    fn short_new_password_rejected() {
        let form = ChangePasswordForm {
            current_password: "old".into(),
            new_password: "abc".into(),
            confirm_password: "abc".into(),
        };
        assert!(form.validate().is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Filter normalization
// ═══════════════════════════════════════════════════════════════════

mod filter_input {
    use super::*;

    fn normalized(edits: Vec<FilterEdit>) -> Result<FilterCriteria, CoreError> {
        let mut raw = RawFilterInput::default();
        for edit in edits {
            raw.apply(edit);
        }
        raw.normalize()
    }

    #[test]
    fn blank_fields_mean_no_constraint() {
        let criteria = normalized(vec![
            FilterEdit::SearchText("   ".into()),
            FilterEdit::MinAmount(String::new()),
            FilterEdit::Type("null".into()),
        ])
        .unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn search_text_trimmed() {
        let criteria = normalized(vec![FilterEdit::SearchText("  coffee ".into())]).unwrap();
        assert_eq!(criteria.search_text.as_deref(), Some("coffee"));
    }

    #[test]
    fn type_accepts_codes_and_names() {
        let by_code = normalized(vec![FilterEdit::Type("1".into())]).unwrap();
        let by_name = normalized(vec![FilterEdit::Type("income".into())]).unwrap();
        assert_eq!(by_code.transaction_type, Some(EntryType::Income));
        assert_eq!(by_name.transaction_type, Some(EntryType::Income));
        assert!(normalized(vec![FilterEdit::Type("both".into())]).is_err());
    }

    #[test]
    fn inverted_ranges_rejected() {
        assert!(normalized(vec![
            FilterEdit::StartDate("2025-02-01".into()),
            FilterEdit::EndDate("2025-01-01".into()),
        ])
        .is_err());
        assert!(normalized(vec![
            FilterEdit::MinAmount("500".into()),
            FilterEdit::MaxAmount("100".into()),
        ])
        .is_err());
    }

    #[test]
    fn negative_amount_rejected() {
        assert!(normalized(vec![FilterEdit::MinAmount("-5".into())]).is_err());
    }

    #[test]
    fn invalid_category_rejected() {
        assert!(normalized(vec![FilterEdit::Category("not-a-uuid".into())]).is_err());
    }

    #[test]
    fn clear_resets_everything() {
        let criteria = normalized(vec![
            FilterEdit::SearchText("rent".into()),
            FilterEdit::MaxAmount("100".into()),
            FilterEdit::Clear,
        ])
        .unwrap();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn query_omits_empty_fields() {
        let query = TransactionQuery {
            criteria: FilterCriteria::default(),
            page_number: 1,
            page_size: 10,
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("pageNumber".to_string(), "1".to_string()),
                ("pageSize".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn query_includes_set_fields() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let query = TransactionQuery {
            criteria: FilterCriteria {
                search_text: Some("rent".into()),
                start_date: Some(make_date(2025, 1, 1)),
                end_date: None,
                category_ids: vec![a, b],
                min_amount: Some(10.0),
                max_amount: None,
                transaction_type: Some(EntryType::Expense),
            },
            page_number: 2,
            page_size: 25,
        };
        let pairs = query.to_query_pairs();
        let has = |k: &str, v: &str| pairs.iter().any(|(key, val)| key == k && val == v);
        assert!(has("pageNumber", "2"));
        assert!(has("searchText", "rent"));
        assert!(has("startDate", "2025-01-01T00:00:00.000Z"));
        assert!(has("minAmount", "10"));
        assert!(has("type", "0"));
        assert!(has("categoryIds", &a.to_string()));
        assert!(has("categoryIds", &b.to_string()));
        assert!(!pairs.iter().any(|(k, _)| k == "endDate" || k == "maxAmount"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings & routes
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;
    use std::collections::HashMap;

    fn with(vars: &[(&str, &str)]) -> Result<ClientSettings, CoreError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientSettings::default().with_overrides(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = ClientSettings::default();
        assert_eq!(s.api_base_url, "http://localhost:5000/api");
        assert_eq!(s.default_page_size, 10);
        assert_eq!(s.filter_debounce_ms, 300);
        assert_eq!(s.storage_dir, None);
    }

    #[test]
    fn overrides_applied() {
        let s = with(&[
            ("FINANCE_TRACKER_API_URL", "https://finance.example.com/api/"),
            ("FINANCE_TRACKER_PAGE_SIZE", "25"),
            ("FINANCE_TRACKER_DEBOUNCE_MS", "150"),
            ("FINANCE_TRACKER_DATA_DIR", "/tmp/finance"),
        ])
        .unwrap();
        assert_eq!(s.api_base_url, "https://finance.example.com/api");
        assert_eq!(s.default_page_size, 25);
        assert_eq!(s.filter_debounce_ms, 150);
        assert_eq!(s.resolve_storage_dir().unwrap(), std::path::PathBuf::from("/tmp/finance"));
    }

    #[test]
    fn unparsable_numbers_rejected() {
        assert!(matches!(
            with(&[("FINANCE_TRACKER_PAGE_SIZE", "0")]),
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            with(&[("FINANCE_TRACKER_DEBOUNCE_MS", "soon")]),
            Err(CoreError::ValidationError(_))
        ));
    }
}

mod routes {
    use super::*;

    #[test]
    fn protected_routes_need_a_session() {
        assert_eq!(Route::Budgets.guard(false), Route::Login);
        assert_eq!(Route::Budgets.guard(true), Route::Budgets);
    }

    #[test]
    fn guest_routes_bounce_logged_in_users() {
        assert_eq!(Route::Login.guard(true), Route::Dashboard);
        assert_eq!(Route::Register.guard(true), Route::Dashboard);
        assert_eq!(Route::Register.guard(false), Route::Register);
    }
}
