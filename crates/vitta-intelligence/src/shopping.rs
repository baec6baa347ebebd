// ABOUTME: Shopping list aggregation - sums a day's items by name and unit, scales to week and month
// ABOUTME: Lists are anchored to a start day and always produced as a weekly/monthly pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{Duration, NaiveDate};
use vitta_core::models::{PlanItem, Quantity, ShoppingLine, ShoppingListDraft, ShoppingPeriod};

/// Sum one day's quantities grouped by (name, unit), keeping first-seen order
#[must_use]
pub fn aggregate_daily<'a>(items: impl IntoIterator<Item = &'a PlanItem>) -> Vec<ShoppingLine> {
    let mut lines = Vec::new();
    for item in items {
        accumulate(&mut lines, &item.name, &item.quantity);
    }
    lines
}

/// Same aggregation from raw display strings, as stored by older rows
#[must_use]
pub fn aggregate_display_strings<'a>(
    items: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<ShoppingLine> {
    let mut lines = Vec::new();
    for (name, quantity_text) in items {
        accumulate(&mut lines, name, &Quantity::parse(quantity_text));
    }
    lines
}

fn accumulate(lines: &mut Vec<ShoppingLine>, name: &str, quantity: &Quantity) {
    let (value, unit) = quantity.shopping_measure();
    let name = name.trim();
    match lines
        .iter_mut()
        .find(|line| line.name == name && line.unit == unit)
    {
        Some(line) => line.quantity += value,
        None => lines.push(ShoppingLine {
            name: name.to_owned(),
            unit,
            quantity: value,
        }),
    }
}

/// `ceil(daily x days)`, ignoring float noise below a thousandth
#[must_use]
pub fn scale_quantity(daily: f64, days: u32) -> f64 {
    let scaled = (daily * f64::from(days) * 1000.0).round() / 1000.0;
    scaled.ceil()
}

/// Build the list for one period starting on `start`
#[must_use]
pub fn build_list(
    daily: &[ShoppingLine],
    period: ShoppingPeriod,
    start: NaiveDate,
) -> ShoppingListDraft {
    let days = period.days();
    ShoppingListDraft {
        period,
        start_date: start,
        end_date: start + Duration::days(i64::from(days) - 1),
        items: daily
            .iter()
            .map(|line| ShoppingLine {
                name: line.name.clone(),
                unit: line.unit.clone(),
                quantity: scale_quantity(line.quantity, days),
            })
            .collect(),
    }
}

/// Weekly and monthly lists for one day of items
#[must_use]
pub fn build_shopping_lists<'a>(
    items: impl IntoIterator<Item = &'a PlanItem>,
    start: NaiveDate,
) -> Vec<ShoppingListDraft> {
    let daily = aggregate_daily(items);
    ShoppingPeriod::ALL
        .iter()
        .map(|period| build_list(&daily, *period, start))
        .collect()
}
