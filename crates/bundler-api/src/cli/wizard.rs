//! Interactive bundle wizard (`bundler create`).
//!
//! Drives a `WizardStateMachine` with dialoguer prompts: one screen per step,
//! a navigation menu at the bottom of each screen, and an auto-saved draft
//! after every transition so `bundler create --resume` can pick the session
//! back up.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use uuid::Uuid;

use bundler_core::platform::Notifier;
use bundler_core::repository::bundle::BundleRepository;
use bundler_core::wizard::assembler::BundleAssembler;
use bundler_core::wizard::draft_store::{SNAPSHOT_SCHEMA_VERSION, WizardDraft, WizardDraftStore};
use bundler_core::wizard::edit::DraftEdit;
use bundler_core::wizard::machine::{SubmitError, SubmitOutcome, WizardStateMachine};
use bundler_infra::shopify::ShopifyAdminClient;
use bundler_types::bundle::{DiscountType, ProductSelection};
use bundler_types::record::BundleRecord;
use bundler_types::wizard::{FieldErrors, Step};

use crate::cli::bundle::print_bundle;
use crate::state::AppState;

const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

/// Prints success messages to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!();
        println!("  {} {}", style("✓").green().bold(), style(message).green());
    }
}

type Wizard = WizardStateMachine<ConsoleNotifier>;

/// Draft row identity for the running session.
struct Session {
    id: Uuid,
    created_at: Option<DateTime<Utc>>,
}

enum Nav {
    Next,
    Back,
    Quit,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Start a fresh wizard session.
pub async fn run_create(state: &AppState, token: Option<String>) -> Result<()> {
    let client = state.admin_client(token)?;
    let wizard = WizardStateMachine::new(state.config.wizard, ConsoleNotifier);
    let session = Session {
        id: Uuid::now_v7(),
        created_at: None,
    };

    println!();
    println!("  {} New bundle", style("*").cyan().bold());
    run_wizard_loop(state, &client, wizard, session).await
}

/// Pick a saved session and continue it.
pub async fn run_resume(state: &AppState, token: Option<String>) -> Result<()> {
    let drafts = state
        .draft_store
        .list_drafts()
        .await
        .context("Failed to list wizard drafts")?;

    if drafts.is_empty() {
        println!();
        println!("  No saved drafts found. Start a new session with: bundler create");
        println!();
        return Ok(());
    }

    let items: Vec<String> = drafts
        .iter()
        .map(|d| {
            let name = if d.bundle_name.trim().is_empty() {
                "(unnamed)"
            } else {
                d.bundle_name.as_str()
            };
            format!(
                "{name} -- step {}, updated {}",
                d.step,
                d.updated_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect();

    println!();
    println!("  {} Saved wizard sessions:", style("*").cyan().bold());
    println!();

    let selection = Select::new().items(&items).default(0).interact()?;

    let draft = state
        .draft_store
        .load_draft(&drafts[selection].session_id)
        .await
        .context("Failed to load draft")?
        .context("Draft not found")?;

    if draft.schema_version != SNAPSHOT_SCHEMA_VERSION {
        bail!(
            "Draft was saved with schema version {} (expected {SNAPSHOT_SCHEMA_VERSION})",
            draft.schema_version
        );
    }
    let snapshot = draft
        .snapshot()
        .context("Failed to deserialize wizard draft")?;

    let client = state.admin_client(token)?;
    let wizard = WizardStateMachine::restore(snapshot, ConsoleNotifier);
    let session = Session {
        id: draft.session_id,
        created_at: Some(draft.created_at),
    };
    run_wizard_loop(state, &client, wizard, session).await
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

async fn run_wizard_loop(
    state: &AppState,
    client: &ShopifyAdminClient,
    mut wizard: Wizard,
    mut session: Session,
) -> Result<()> {
    loop {
        render_header(&wizard);

        let nav = match wizard.current_step() {
            Step::Name => prompt_name(&mut wizard)?,
            Step::Products => prompt_products(&mut wizard, client).await?,
            Step::Variants => prompt_variants(&mut wizard)?,
            Step::Discount => prompt_discount(&mut wizard)?,
            Step::Description => prompt_description(&mut wizard)?,
        };

        match nav {
            Nav::Quit => {
                save_session(state, &mut session, &wizard).await;
                println!();
                println!(
                    "  Draft saved. Resume with: {}",
                    style("bundler create --resume").yellow()
                );
                println!();
                return Ok(());
            }
            Nav::Back => {
                wizard.previous();
            }
            Nav::Next if wizard.is_final_step() => match wizard.submit(client).await {
                Ok(SubmitOutcome::Created {
                    definition,
                    operation,
                }) => {
                    let record = BundleRecord::new(definition, operation);
                    println!("  {}", style(BundleAssembler::summarize(&record.definition)).dim());

                    if let Err(e) = state.draft_store.delete_draft(&session.id).await {
                        tracing::warn!(error = %e, session_id = %session.id, "failed to delete wizard draft");
                    }
                    state
                        .bundle_repo
                        .create(&record)
                        .await
                        .context("Bundle was created but could not be recorded locally")?;

                    print_bundle(&record);
                    return Ok(());
                }
                Ok(SubmitOutcome::Rejected { .. }) => {}
                Err(SubmitError::Platform(message)) => {
                    println!();
                    println!("  {} {}", style("✗").red().bold(), style(message).red());
                }
                Err(e @ SubmitError::NotOnFinalStep(_)) => return Err(e.into()),
            },
            Nav::Next => {
                wizard.next();
            }
        }

        save_session(state, &mut session, &wizard).await;
    }
}

/// Persist the current snapshot. Failures are logged and do not stop the
/// wizard.
async fn save_session(state: &AppState, session: &mut Session, wizard: &Wizard) {
    let draft = match WizardDraft::from_snapshot(session.id, &wizard.snapshot(), session.created_at)
    {
        Ok(draft) => draft,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize wizard snapshot");
            return;
        }
    };

    let created_at = draft.created_at;
    match state.draft_store.save_draft(draft).await {
        Ok(()) => session.created_at = Some(created_at),
        Err(e) => tracing::warn!(error = %e, session_id = %session.id, "failed to save wizard draft"),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_header(wizard: &Wizard) {
    let step = wizard.current_step();
    println!();
    println!(
        "  {}  {}  {}",
        style(format!("Step {}/{}", wizard.step_index(), wizard.step_count())).dim(),
        style(step.title()).cyan().bold(),
        style(progress_bar(wizard.progress_percent())).dim()
    );
    println!();

    if wizard.errors_visible() {
        render_errors(wizard.errors());
    }
}

fn render_errors(errors: &FieldErrors) {
    for error in errors.values() {
        println!("  {} {}", style("✗").red().bold(), style(error).red());
    }
    if !errors.is_empty() {
        println!();
    }
}

fn render_selection(products: &[ProductSelection]) {
    if products.is_empty() {
        println!("  {}", style("No products selected.").dim());
        println!();
        return;
    }

    for product in products {
        let vendor = if product.vendor.is_empty() {
            String::new()
        } else {
            format!(" ({})", product.vendor)
        };
        println!(
            "  {}{} x{}",
            style(&product.title).white().bold(),
            style(vendor).dim(),
            product.quantity
        );
        for option in &product.options {
            let values: Vec<String> = option
                .values
                .iter()
                .map(|v| {
                    if v.selected {
                        style(&v.value).green().to_string()
                    } else {
                        style(&v.value).dim().strikethrough().to_string()
                    }
                })
                .collect();
            println!("      {} {}", style(format!("{}:", option.name)).dim(), values.join(" "));
        }
    }
    println!();
}

fn progress_bar(percent: u8) -> String {
    const WIDTH: usize = 20;
    let filled = (percent as usize * WIDTH) / 100;
    format!("[{}{}] {percent}%", "█".repeat(filled), "░".repeat(WIDTH - filled))
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn prompt_name(wizard: &mut Wizard) -> Result<Nav> {
    let draft = wizard.draft().clone();

    let name: String = Input::new()
        .with_prompt("Bundle name")
        .with_initial_text(draft.bundle_name)
        .allow_empty(true)
        .interact_text()?;
    wizard.apply(DraftEdit::SetName { name });

    let enabled = Confirm::new()
        .with_prompt("Create a section block for this bundle?")
        .default(draft.create_section_block)
        .interact()?;
    wizard.apply(DraftEdit::SetCreateSectionBlock { enabled });

    choose_nav(wizard)
}

async fn prompt_products(wizard: &mut Wizard, client: &ShopifyAdminClient) -> Result<Nav> {
    let edit_options_here = !wizard.snapshot().config.variant_step;

    loop {
        render_selection(&wizard.draft().products);
        render_errors(&wizard.live_errors());

        let mut actions = vec![ProductAction::Pick];
        if !wizard.draft().products.is_empty() {
            actions.push(ProductAction::Quantity);
            actions.push(ProductAction::Remove);
            if edit_options_here {
                actions.push(ProductAction::Options);
            }
        }
        actions.extend([ProductAction::Continue, ProductAction::Back, ProductAction::Quit]);

        let labels: Vec<&str> = actions.iter().map(ProductAction::label).collect();
        let choice = Select::new()
            .with_prompt("Products")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            ProductAction::Pick => pick_products(wizard, client).await?,
            ProductAction::Quantity => set_quantity(wizard)?,
            ProductAction::Remove => {
                if let Some(product_id) = select_product(wizard, "Remove which product?")? {
                    wizard.apply(DraftEdit::RemoveProduct { product_id });
                }
            }
            ProductAction::Options => edit_options(wizard)?,
            ProductAction::Continue => return Ok(Nav::Next),
            ProductAction::Back => return Ok(Nav::Back),
            ProductAction::Quit => return Ok(Nav::Quit),
        }
    }
}

#[derive(Clone, Copy)]
enum ProductAction {
    Pick,
    Quantity,
    Remove,
    Options,
    Continue,
    Back,
    Quit,
}

impl ProductAction {
    fn label(&self) -> &'static str {
        match self {
            ProductAction::Pick => "Pick products",
            ProductAction::Quantity => "Set quantity",
            ProductAction::Remove => "Remove a product",
            ProductAction::Options => "Edit option values",
            ProductAction::Continue => "Continue",
            ProductAction::Back => "Back",
            ProductAction::Quit => "Save and quit",
        }
    }
}

fn prompt_variants(wizard: &mut Wizard) -> Result<Nav> {
    loop {
        render_selection(&wizard.draft().products);
        render_errors(&wizard.live_errors());

        let choice = Select::new()
            .with_prompt("Variants")
            .items(&["Edit option values", "Continue", "Back", "Save and quit"])
            .default(0)
            .interact()?;

        match choice {
            0 => edit_options(wizard)?,
            1 => return Ok(Nav::Next),
            2 => return Ok(Nav::Back),
            _ => return Ok(Nav::Quit),
        }
    }
}

fn prompt_discount(wizard: &mut Wizard) -> Result<Nav> {
    let draft = wizard.draft().clone();

    let types = [DiscountType::Percentage, DiscountType::Fixed];
    let current = types
        .iter()
        .position(|t| *t == draft.discount_type)
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Discount type")
        .items(&["Percentage (%)", "Fixed amount ($)"])
        .default(current)
        .interact()?;
    let discount_type = types[choice];
    wizard.apply(DraftEdit::SetDiscountType { discount_type });

    let value: String = Input::new()
        .with_prompt(format!("Discount value ({})", discount_type.suffix()))
        .with_initial_text(draft.discount_value)
        .allow_empty(true)
        .interact_text()?;
    wizard.apply(DraftEdit::SetDiscountValue { value });

    let start = prompt_date("Start date (YYYY-MM-DD)", draft.start_date)?;
    wizard.apply(DraftEdit::SetStartDate { date: start });
    let end = prompt_date("End date (YYYY-MM-DD)", draft.end_date)?;
    wizard.apply(DraftEdit::SetEndDate { date: end });

    choose_nav(wizard)
}

fn prompt_description(wizard: &mut Wizard) -> Result<Nav> {
    let description: String = Input::new()
        .with_prompt("Description")
        .with_initial_text(wizard.draft().description.clone())
        .allow_empty(true)
        .interact_text()?;
    wizard.apply(DraftEdit::SetDescription { description });

    let preview = BundleAssembler::assemble(wizard.draft());
    println!();
    println!(
        "  {} {}",
        style("Ready:").bold(),
        BundleAssembler::summarize(&preview)
    );

    choose_nav(wizard)
}

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

fn choose_nav(wizard: &Wizard) -> Result<Nav> {
    let forward = if wizard.is_final_step() {
        "Create bundle"
    } else {
        "Continue"
    };
    let choice = Select::new()
        .items(&[forward, "Back", "Save and quit"])
        .default(0)
        .interact()?;

    Ok(match choice {
        0 => Nav::Next,
        1 => Nav::Back,
        _ => Nav::Quit,
    })
}

async fn pick_products(wizard: &mut Wizard, client: &ShopifyAdminClient) -> Result<()> {
    let current: Vec<String> = wizard
        .draft()
        .products
        .iter()
        .map(|p| p.id.clone())
        .collect();

    let raw: String = Input::new()
        .with_prompt("Product ids (comma separated)")
        .with_initial_text(current.join(", "))
        .allow_empty(true)
        .interact_text()?;

    let ids = parse_product_ids(&raw);
    if !wizard.pick_products(client, &ids).await {
        println!(
            "  {} Could not load products; selection unchanged.",
            style("!").yellow().bold()
        );
    }
    Ok(())
}

fn set_quantity(wizard: &mut Wizard) -> Result<()> {
    let Some(product_id) = select_product(wizard, "Set quantity for which product?")? else {
        return Ok(());
    };
    let current = wizard
        .draft()
        .product(&product_id)
        .map(|p| p.quantity)
        .unwrap_or(1);

    let quantity: String = Input::new()
        .with_prompt("Quantity")
        .with_initial_text(current.to_string())
        .allow_empty(true)
        .interact_text()?;
    wizard.apply(DraftEdit::SetQuantity {
        product_id,
        quantity,
    });
    Ok(())
}

/// Let the user pick each option's kept values, then apply one toggle per
/// value whose state changed.
fn edit_options(wizard: &mut Wizard) -> Result<()> {
    let Some(product_id) = select_product(wizard, "Edit which product?")? else {
        return Ok(());
    };
    let Some(product) = wizard.draft().product(&product_id).cloned() else {
        return Ok(());
    };

    if product.options.is_empty() {
        println!("  {}", style("This product has no options.").dim());
        return Ok(());
    }

    for option in &product.options {
        let labels: Vec<&str> = option.values.iter().map(|v| v.value.as_str()).collect();
        let defaults: Vec<bool> = option.values.iter().map(|v| v.selected).collect();

        let chosen = MultiSelect::new()
            .with_prompt(format!("{} (space to toggle)", option.name))
            .items(&labels)
            .defaults(&defaults)
            .interact()?;

        for (index, value) in option.values.iter().enumerate() {
            if chosen.contains(&index) != value.selected {
                wizard.apply(DraftEdit::ToggleOptionValue {
                    product_id: product.id.clone(),
                    option_id: option.id.clone(),
                    value: value.value.clone(),
                });
            }
        }
    }
    Ok(())
}

fn select_product(wizard: &Wizard, prompt: &str) -> Result<Option<String>> {
    let products = &wizard.draft().products;
    if products.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = products
        .iter()
        .map(|p| format!("{} ({})", p.title, p.id))
        .collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|index| products[index].id.clone()))
}

fn prompt_date(prompt: &str, current: NaiveDate) -> Result<NaiveDate> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current.format("%Y-%m-%d").to_string())
        .validate_with(|input: &String| parse_date(input).map(|_| ()))
        .interact_text()?;
    parse_date(&raw).map_err(anyhow::Error::msg)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split comma/whitespace separated ids, expanding bare numeric ids to
/// product GIDs and dropping duplicates while keeping order.
fn parse_product_ids(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for token in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let id = if token.chars().all(|c| c.is_ascii_digit()) {
            format!("{PRODUCT_GID_PREFIX}{token}")
        } else {
            token.to_string()
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date in YYYY-MM-DD form", raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_ids_expands_numeric_ids() {
        let ids = parse_product_ids("123, gid://shopify/Product/456 789");
        assert_eq!(
            ids,
            vec![
                "gid://shopify/Product/123".to_string(),
                "gid://shopify/Product/456".to_string(),
                "gid://shopify/Product/789".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_product_ids_dedupes_and_skips_blanks() {
        let ids = parse_product_ids(" 1,,1 , ");
        assert_eq!(ids, vec!["gid://shopify/Product/1".to_string()]);
        assert!(parse_product_ids("   ").is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2026-07-04 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 4).unwrap()
        );
        assert!(parse_date("07/04/2026").is_err());
        assert!(parse_date("2026-02-30").is_err());
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(50), format!("[{}{}] 50%", "█".repeat(10), "░".repeat(10)));
        assert!(progress_bar(100).starts_with(&format!("[{}]", "█".repeat(20))));
    }
}
