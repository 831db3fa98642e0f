//! Item listing and annotation commands

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use label_review_core::{display_tags, ChangeRecord, Item};
use serde::Serialize;

use crate::cli::ListArgs;
use crate::context::Context;
use crate::output::{
    format_relative_time, format_timestamp, print_field, print_list_field, print_section,
    print_text_field, status_badge, truncate, TableDisplay,
};

const TEXT_PREVIEW: usize = 48;

/// An item together with its position in the dataset
#[derive(Debug, Serialize)]
struct ItemView<'a> {
    index: usize,
    #[serde(flatten)]
    item: &'a Item,
}

impl TableDisplay for ItemView<'_> {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.index),
            Cell::new(self.item.id),
            Cell::new(truncate(&self.item.text, TEXT_PREVIEW)),
            Cell::new(&self.item.label),
            Cell::new(&self.item.category),
            Cell::new(display_tags(&self.item.tags)),
            Cell::new(if self.item.user_verified { "yes" } else { "no" }),
            Cell::new(status_badge(&self.item.review_status)),
        ]
    }

    fn display_single(&self) {
        let item = self.item;
        print_section(&format!("Item {} (#{})", item.id, self.index));
        print_field("Text", &item.text);
        print_text_field("Label", &item.label);
        print_text_field("Category", &item.category);
        print_list_field("Tags", &item.tags);
        print_field(
            "Verified",
            &if item.user_verified {
                format!("{} by {}", "yes".green(), item.verified_by)
            } else {
                "no".to_string()
            },
        );
        print_field("Review status", &status_badge(&item.review_status));
        print_field("Version", &item.version.to_string());
        print_field("Last updated", &format_relative_time(&item.last_updated));

        if let Some((label, probability)) = item.top_prediction() {
            print_field("Top prediction", &format!("{label} ({probability:.2})"));
        }

        print_section("History");
        if item.history.is_empty() {
            println!("  {}", "No changes recorded.".dimmed());
        }
        for record in &item.history {
            println!("  {}", format_change(record));
        }
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            self.index,
            self.item.id,
            self.item.label,
            if self.item.user_verified { "verified" } else { "-" },
            truncate(&self.item.text, TEXT_PREVIEW)
        );
    }
}

fn format_change(record: &ChangeRecord) -> String {
    format!(
        "{} {} {}: {:?} -> {:?}",
        format_timestamp(&record.timestamp).dimmed(),
        record.user.cyan(),
        record.field.bold(),
        record.old_value,
        record.new_value
    )
}

pub fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let session = ctx.require_session()?;

    let views: Vec<ItemView> = session
        .items()
        .enumerate()
        .filter(|(_, item)| args.label.as_deref().map_or(true, |l| item.label == l))
        .filter(|(_, item)| !args.unverified || !item.user_verified)
        .take(args.limit.unwrap_or(usize::MAX))
        .map(|(index, item)| ItemView { index, item })
        .collect();

    ctx.output.write_list(
        &views,
        &["#", "ID", "Text", "Label", "Category", "Tags", "Verified", "Status"],
    )
}

pub fn show(ctx: &Context, index: usize) -> Result<()> {
    let session = ctx.require_session()?;
    let item = session.item(index)?;
    ctx.output.write(&ItemView { index, item })
}

pub fn update(ctx: &Context, index: usize, assignments: &[(String, String)]) -> Result<()> {
    let mut session = ctx.require_session()?;
    let fields: Vec<(&str, &str)> = assignments
        .iter()
        .map(|(field, value)| (field.as_str(), value.as_str()))
        .collect();

    session.update_fields(index, &fields)?;
    ctx.save_session(&session)?;

    ctx.output.success(&format!("Updated {} field(s) on item #{index}", fields.len()));
    ctx.output.write(&ItemView { index, item: session.item(index)? })
}

pub fn label(ctx: &Context, index: usize, label: &str) -> Result<()> {
    let mut session = ctx.require_session()?;
    session.quick_label(index, label)?;
    ctx.save_session(&session)?;

    ctx.output.success(&format!(
        "Labeled item #{index} as {label:?}, verified by {}",
        session.current_user()
    ));
    Ok(())
}

pub fn flag(ctx: &Context, index: usize, status: &str) -> Result<()> {
    let mut session = ctx.require_session()?;
    session.flag_for_review(index, status)?;
    ctx.save_session(&session)?;

    ctx.output.success(&format!("Item #{index} marked {status}"));
    Ok(())
}
