use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gestock_core::clients::{Client, ClientService, NewClient};
use gestock_core::db;
use gestock_core::products::{NewProduct, Product, ProductService};
use gestock_core::prospects::{NewProspect, Prospect, ProspectService};
use gestock_core::quotes::{
    NewQuote, NewQuoteLine, QuoteError, QuoteRepository, QuoteService,
};
use gestock_core::utils::IdGenerator;

mod common;

struct TestContext {
    pool: Arc<db::DbPool>,
    clients: ClientService,
    prospects: ProspectService,
    products: ProductService,
    quotes: QuoteService,
    _dir: tempfile::TempDir,
}

fn setup() -> TestContext {
    let (pool, dir) = common::setup_pool();
    let id_generator = Arc::new(IdGenerator::with_seed(42));

    TestContext {
        clients: ClientService::new(pool.clone(), id_generator.clone()),
        prospects: ProspectService::new(pool.clone()),
        products: ProductService::new(pool.clone()),
        quotes: QuoteService::new(pool.clone(), id_generator),
        pool,
        _dir: dir,
    }
}

fn create_client(ctx: &TestContext) -> Client {
    ctx.clients
        .create_client(NewClient {
            name: "Acme Industries".to_string(),
            account_number: None,
            tax_id: None,
            annual_revenue: Some(dec!(250000)),
            is_tax_exempt: false,
        })
        .unwrap()
}

fn create_prospect(ctx: &TestContext) -> Prospect {
    ctx.prospects
        .create_prospect(NewProspect {
            company_name: "Horizon Logistics".to_string(),
            contact_name: Some("S. Haddad".to_string()),
            city: Some("Sfax".to_string()),
        })
        .unwrap()
}

/// 2.5 kg per unit, no eco fee.
fn create_heavy_product(ctx: &TestContext) -> Product {
    ctx.products
        .create_product(NewProduct {
            code: "P-100".to_string(),
            label: "Steel drum".to_string(),
            category: Some("Packaging".to_string()),
            unit_weight_kg: Some(dec!(2.5)),
            is_active: true,
            has_eco_fee: false,
            wholesale_price: Some(dec!(90)),
            retail_price: Some(dec!(110)),
        })
        .unwrap()
}

/// 1.2 kg per unit, eco-fee flagged.
fn create_eco_product(ctx: &TestContext) -> Product {
    ctx.products
        .create_product(NewProduct {
            code: "P-200".to_string(),
            label: "Coated canister".to_string(),
            category: Some("Packaging".to_string()),
            unit_weight_kg: Some(dec!(1.2)),
            is_active: true,
            has_eco_fee: true,
            wholesale_price: None,
            retail_price: None,
        })
        .unwrap()
}

fn new_quote(
    subject: &str,
    client_id: Option<&str>,
    prospect_id: Option<&str>,
    lines: Vec<NewQuoteLine>,
) -> NewQuote {
    NewQuote {
        quote_number: None,
        subject: subject.to_string(),
        client_id: client_id.map(str::to_string),
        prospect_id: prospect_id.map(str::to_string),
        due_date: None,
        delivery_delay: None,
        delivery_mode: None,
        payment_mode: None,
        lines,
    }
}

fn line(product_id: &str, quantity: i32, unit_price: Decimal) -> NewQuoteLine {
    NewQuoteLine {
        product_id: product_id.to_string(),
        quantity,
        unit_price,
        tax_rate: Some(dec!(0.19)),
    }
}

#[test]
fn empty_quote_has_zero_totals_and_generated_number() {
    let ctx = setup();
    let client = create_client(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote("Empty quote", Some(&client.id), None, vec![]))
        .unwrap();

    assert!(quote.quote_number.starts_with("DEV-"));
    assert_eq!(quote.total_incl_tax, Decimal::ZERO);
    assert_eq!(quote.total_weight_kg, Decimal::ZERO);
    assert!(quote.lines.is_empty());
    assert_eq!(quote.client.as_ref().unwrap().id, client.id);
    assert!(quote.prospect.is_none());
}

#[test]
fn created_lines_carry_derived_pricing() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Drums for Acme",
            Some(&client.id),
            None,
            vec![line(&heavy.id, 3, dec!(100.00))],
        ))
        .unwrap();

    assert_eq!(quote.lines.len(), 1);
    let priced = &quote.lines[0];
    assert_eq!(priced.tax_amount, dec!(19.00));
    assert_eq!(priced.eco_fee, Decimal::ZERO);
    assert_eq!(priced.unit_price_incl_tax, dec!(119.00));
    assert_eq!(priced.total_incl_tax, dec!(357.00));
    assert_eq!(priced.weight_kg, Some(dec!(7.5)));

    assert_eq!(quote.total_incl_tax, dec!(357.00));
    assert_eq!(quote.total_weight_kg, dec!(7.5));
}

#[test]
fn eco_fee_applies_only_to_flagged_products() {
    let ctx = setup();
    let client = create_client(&ctx);
    let eco = create_eco_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Canisters",
            Some(&client.id),
            None,
            vec![line(&eco.id, 1, dec!(50.00))],
        ))
        .unwrap();

    let priced = &quote.lines[0];
    assert_eq!(priced.eco_fee, dec!(2.50));
    assert_eq!(priced.unit_price_incl_tax, dec!(54.00));
    assert_eq!(quote.total_incl_tax, dec!(54.00));
    assert_eq!(quote.total_weight_kg, dec!(1.2));
}

#[test]
fn missing_tax_rate_falls_back_to_standard_rate() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Default VAT",
            Some(&client.id),
            None,
            vec![NewQuoteLine {
                product_id: heavy.id.clone(),
                quantity: 1,
                unit_price: dec!(100.00),
                tax_rate: None,
            }],
        ))
        .unwrap();

    assert_eq!(quote.lines[0].tax_rate, dec!(0.19));
    assert_eq!(quote.total_incl_tax, dec!(119.00));
}

#[test]
fn quote_requires_exactly_one_counterparty() {
    let ctx = setup();
    let client = create_client(&ctx);
    let prospect = create_prospect(&ctx);

    let neither = ctx
        .quotes
        .create_quote(new_quote("No counterparty", None, None, vec![]));
    assert!(matches!(neither, Err(QuoteError::InvalidOperation(_))));

    let both = ctx.quotes.create_quote(new_quote(
        "Two counterparties",
        Some(&client.id),
        Some(&prospect.id),
        vec![],
    ));
    assert!(matches!(both, Err(QuoteError::InvalidOperation(_))));
}

#[test]
fn unknown_counterparty_is_not_found() {
    let ctx = setup();

    let result = ctx
        .quotes
        .create_quote(new_quote("Ghost client", Some("missing"), None, vec![]));
    assert!(matches!(result, Err(QuoteError::NotFound(_))));
}

#[test]
fn failed_creation_persists_nothing() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);

    // Second line references a product that does not exist; the whole
    // operation must roll back, including the first line and the shell.
    let result = ctx.quotes.create_quote(new_quote(
        "Partially bad",
        Some(&client.id),
        None,
        vec![
            line(&heavy.id, 2, dec!(10.00)),
            line("missing-product", 1, dec!(5.00)),
        ],
    ));

    assert!(matches!(result, Err(QuoteError::NotFound(_))));
    assert!(ctx.quotes.list_quotes().unwrap().is_empty());
}

#[test]
fn caller_supplied_number_conflicts_are_rejected() {
    let ctx = setup();
    let client = create_client(&ctx);

    let mut first = new_quote("First", Some(&client.id), None, vec![]);
    first.quote_number = Some("DEV-20260101-0001".to_string());
    ctx.quotes.create_quote(first).unwrap();

    let mut second = new_quote("Second", Some(&client.id), None, vec![]);
    second.quote_number = Some("DEV-20260101-0001".to_string());
    let result = ctx.quotes.create_quote(second);

    assert!(matches!(result, Err(QuoteError::DuplicateNumber(_))));
}

#[test]
fn generated_numbers_are_unique_across_creates() {
    let ctx = setup();
    let client = create_client(&ctx);

    let mut numbers = Vec::new();
    for i in 0..5 {
        let quote = ctx
            .quotes
            .create_quote(new_quote(
                &format!("Quote {}", i),
                Some(&client.id),
                None,
                vec![],
            ))
            .unwrap();
        numbers.push(quote.quote_number);
    }

    let mut deduped = numbers.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), numbers.len());
}

#[test]
fn add_then_remove_line_restores_totals() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);
    let eco = create_eco_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Round trip",
            Some(&client.id),
            None,
            vec![line(&heavy.id, 3, dec!(100.00))],
        ))
        .unwrap();
    let before = (quote.total_incl_tax, quote.total_weight_kg);

    let with_extra = ctx
        .quotes
        .add_line(&quote.id, line(&eco.id, 1, dec!(50.00)))
        .unwrap();
    assert_eq!(with_extra.lines.len(), 2);
    assert_eq!(with_extra.total_incl_tax, dec!(411.00));
    assert_eq!(with_extra.total_weight_kg, dec!(8.7));

    let added = with_extra
        .lines
        .iter()
        .find(|l| l.product_id == eco.id)
        .unwrap();
    let restored = ctx.quotes.remove_line(&quote.id, &added.id).unwrap();

    assert_eq!(restored.lines.len(), 1);
    assert_eq!(
        (restored.total_incl_tax, restored.total_weight_kg),
        before
    );
}

#[test]
fn totals_always_match_the_line_sum() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);
    let eco = create_eco_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Invariant check",
            Some(&client.id),
            None,
            vec![
                line(&heavy.id, 3, dec!(100.00)),
                line(&eco.id, 2, dec!(50.00)),
                line(&heavy.id, 1, dec!(19.99)),
            ],
        ))
        .unwrap();

    let line_total: Decimal = quote.lines.iter().map(|l| l.total_incl_tax).sum();
    let line_weight: Decimal = quote
        .lines
        .iter()
        .map(|l| l.weight_kg.unwrap_or(Decimal::ZERO))
        .sum();

    assert_eq!(quote.total_incl_tax, line_total);
    assert_eq!(quote.total_weight_kg, line_weight);
}

#[test]
fn removing_a_foreign_line_is_rejected_and_changes_nothing() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);

    let owner = ctx
        .quotes
        .create_quote(new_quote(
            "Owner",
            Some(&client.id),
            None,
            vec![line(&heavy.id, 1, dec!(10.00))],
        ))
        .unwrap();
    let other = ctx
        .quotes
        .create_quote(new_quote(
            "Other",
            Some(&client.id),
            None,
            vec![line(&heavy.id, 2, dec!(20.00))],
        ))
        .unwrap();

    let foreign_line_id = other.lines[0].id.clone();
    let result = ctx.quotes.remove_line(&owner.id, &foreign_line_id);
    assert!(matches!(result, Err(QuoteError::InvalidOperation(_))));

    let owner_after = ctx.quotes.get_quote(&owner.id).unwrap();
    let other_after = ctx.quotes.get_quote(&other.id).unwrap();
    assert_eq!(owner_after.total_incl_tax, owner.total_incl_tax);
    assert_eq!(other_after.lines.len(), 1);
    assert_eq!(other_after.lines[0].id, foreign_line_id);
}

#[test]
fn recalculate_is_idempotent() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Recalc",
            Some(&client.id),
            None,
            vec![line(&heavy.id, 3, dec!(100.00))],
        ))
        .unwrap();

    let first = ctx.quotes.recalculate(&quote.id).unwrap();
    let second = ctx.quotes.recalculate(&quote.id).unwrap();

    assert_eq!(first.total_incl_tax, second.total_incl_tax);
    assert_eq!(first.total_weight_kg, second.total_weight_kg);
    assert_eq!(first.total_incl_tax, dec!(357.00));
}

#[test]
fn update_replaces_the_line_set_wholesale() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);
    let eco = create_eco_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Before update",
            Some(&client.id),
            None,
            vec![line(&heavy.id, 3, dec!(100.00))],
        ))
        .unwrap();
    let original_line_id = quote.lines[0].id.clone();

    let updated = ctx
        .quotes
        .update_quote(
            &quote.id,
            gestock_core::quotes::QuoteUpdate {
                quote_number: None,
                subject: "After update".to_string(),
                client_id: Some(client.id.clone()),
                prospect_id: None,
                due_date: None,
                delivery_delay: Some("TWO_WEEKS".to_string()),
                delivery_mode: None,
                payment_mode: None,
                lines: Some(vec![line(&eco.id, 1, dec!(50.00))]),
            },
        )
        .unwrap();

    assert_eq!(updated.subject, "After update");
    assert_eq!(updated.quote_number, quote.quote_number);
    assert_eq!(updated.lines.len(), 1);
    assert_ne!(updated.lines[0].id, original_line_id);
    assert_eq!(updated.total_incl_tax, dec!(54.00));
    assert_eq!(updated.total_weight_kg, dec!(1.2));
}

#[test]
fn update_without_lines_keeps_the_existing_ones() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Keep lines",
            Some(&client.id),
            None,
            vec![line(&heavy.id, 3, dec!(100.00))],
        ))
        .unwrap();

    let updated = ctx
        .quotes
        .update_quote(
            &quote.id,
            gestock_core::quotes::QuoteUpdate {
                quote_number: None,
                subject: "Still the same lines".to_string(),
                client_id: Some(client.id.clone()),
                prospect_id: None,
                due_date: None,
                delivery_delay: None,
                delivery_mode: None,
                payment_mode: None,
                lines: None,
            },
        )
        .unwrap();

    assert_eq!(updated.lines.len(), 1);
    assert_eq!(updated.lines[0].id, quote.lines[0].id);
    assert_eq!(updated.total_incl_tax, dec!(357.00));
}

#[test]
fn update_can_switch_counterparty() {
    let ctx = setup();
    let client = create_client(&ctx);
    let prospect = create_prospect(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote("Switch", Some(&client.id), None, vec![]))
        .unwrap();

    let updated = ctx
        .quotes
        .update_quote(
            &quote.id,
            gestock_core::quotes::QuoteUpdate {
                quote_number: None,
                subject: "Switch".to_string(),
                client_id: None,
                prospect_id: Some(prospect.id.clone()),
                due_date: None,
                delivery_delay: None,
                delivery_mode: None,
                payment_mode: None,
                lines: None,
            },
        )
        .unwrap();

    assert!(updated.client.is_none());
    assert_eq!(updated.prospect.as_ref().unwrap().id, prospect.id);
}

#[test]
fn update_to_an_existing_number_is_a_conflict() {
    let ctx = setup();
    let client = create_client(&ctx);

    let mut first = new_quote("First", Some(&client.id), None, vec![]);
    first.quote_number = Some("DEV-20260101-0007".to_string());
    ctx.quotes.create_quote(first).unwrap();

    let second = ctx
        .quotes
        .create_quote(new_quote("Second", Some(&client.id), None, vec![]))
        .unwrap();

    let result = ctx.quotes.update_quote(
        &second.id,
        gestock_core::quotes::QuoteUpdate {
            quote_number: Some("DEV-20260101-0007".to_string()),
            subject: "Second".to_string(),
            client_id: Some(client.id.clone()),
            prospect_id: None,
            due_date: None,
            delivery_delay: None,
            delivery_mode: None,
            payment_mode: None,
            lines: None,
        },
    );

    assert!(matches!(result, Err(QuoteError::DuplicateNumber(_))));
}

#[test]
fn deleting_a_quote_leaves_no_orphan_lines() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);

    let quote = ctx
        .quotes
        .create_quote(new_quote(
            "Doomed",
            Some(&client.id),
            None,
            vec![
                line(&heavy.id, 1, dec!(10.00)),
                line(&heavy.id, 2, dec!(20.00)),
            ],
        ))
        .unwrap();

    ctx.quotes.delete_quote(&quote.id).unwrap();

    assert!(matches!(
        ctx.quotes.get_quote(&quote.id),
        Err(QuoteError::NotFound(_))
    ));

    let mut conn = db::get_connection(&ctx.pool).unwrap();
    let orphans = QuoteRepository::lines_for_quote(&mut conn, &quote.id).unwrap();
    assert!(orphans.is_empty());
}

#[test]
fn missing_quote_is_not_found_for_every_operation() {
    let ctx = setup();
    create_client(&ctx);

    assert!(matches!(
        ctx.quotes.get_quote("missing"),
        Err(QuoteError::NotFound(_))
    ));
    assert!(matches!(
        ctx.quotes.recalculate("missing"),
        Err(QuoteError::NotFound(_))
    ));
    assert!(matches!(
        ctx.quotes.delete_quote("missing"),
        Err(QuoteError::NotFound(_))
    ));
    assert!(matches!(
        ctx.quotes
            .add_line("missing", line("some-product", 1, dec!(1.00))),
        Err(QuoteError::NotFound(_))
    ));
}

#[test]
fn invalid_line_input_is_rejected_before_persisting() {
    let ctx = setup();
    let client = create_client(&ctx);
    let heavy = create_heavy_product(&ctx);

    let zero_quantity = ctx.quotes.create_quote(new_quote(
        "Bad quantity",
        Some(&client.id),
        None,
        vec![line(&heavy.id, 0, dec!(10.00))],
    ));
    assert!(matches!(zero_quantity, Err(QuoteError::InvalidData(_))));

    let negative_price = ctx.quotes.create_quote(new_quote(
        "Bad price",
        Some(&client.id),
        None,
        vec![line(&heavy.id, 1, dec!(-1.00))],
    ));
    assert!(matches!(negative_price, Err(QuoteError::InvalidData(_))));

    assert!(ctx.quotes.list_quotes().unwrap().is_empty());
}

#[test]
fn finders_locate_quotes_by_number_subject_and_counterparty() {
    let ctx = setup();
    let client = create_client(&ctx);
    let prospect = create_prospect(&ctx);

    let mut for_client = new_quote("Spring catalogue", Some(&client.id), None, vec![]);
    for_client.quote_number = Some("DEV-20260301-0100".to_string());
    for_client.due_date = Some(chrono::NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
    ctx.quotes.create_quote(for_client).unwrap();

    let mut for_prospect = new_quote("Autumn pilot", None, Some(&prospect.id), vec![]);
    for_prospect.due_date = Some(chrono::NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
    ctx.quotes.create_quote(for_prospect).unwrap();

    let by_number = ctx.quotes.get_by_number("DEV-20260301-0100").unwrap();
    assert_eq!(by_number.subject, "Spring catalogue");

    let by_subject = ctx.quotes.search_by_subject("spring").unwrap();
    assert_eq!(by_subject.len(), 1);

    assert_eq!(ctx.quotes.list_by_client(&client.id).unwrap().len(), 1);
    assert_eq!(ctx.quotes.list_by_prospect(&prospect.id).unwrap().len(), 1);
    assert!(matches!(
        ctx.quotes.list_by_client("missing"),
        Err(QuoteError::NotFound(_))
    ));

    let cutoff = chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    assert_eq!(ctx.quotes.list_due_before(cutoff).unwrap().len(), 1);
    assert_eq!(ctx.quotes.list_due_after(cutoff).unwrap().len(), 1);
    assert_eq!(
        ctx.quotes
            .list_by_due_date(chrono::NaiveDate::from_ymd_opt(2026, 6, 30).unwrap())
            .unwrap()
            .len(),
        1
    );

    assert_eq!(ctx.quotes.list_quotes().unwrap().len(), 2);
}

#[test]
fn client_accounts_get_generated_numbers() {
    let ctx = setup();

    let client = create_client(&ctx);
    assert!(client.account_number.starts_with("CLI-"));

    let found = ctx
        .clients
        .get_by_account_number(&client.account_number)
        .unwrap();
    assert_eq!(found.id, client.id);
}
