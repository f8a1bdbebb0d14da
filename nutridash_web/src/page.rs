//! Server-rendered dashboard page.

use std::fmt::Write as _;

use chrono::Local;
use nutridash_core::{ExtractedRecord, FoodEntry};

use crate::state::AppState;

const TEMPLATE: &str = include_str!("../assets/index.html");

/// Records listed on first load; later ones arrive over `/ws`.
pub const RECENT_RECORDS: usize = 20;

#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[must_use]
pub fn render(state: &AppState) -> String {
    let totals = state.catalogue.totals();
    let connection = state.connection_state();

    let cards = state
        .catalogue
        .entries()
        .iter()
        .map(food_card)
        .collect::<String>();
    let records = state
        .records
        .recent(RECENT_RECORDS)
        .iter()
        .map(record_item)
        .collect::<String>();

    TEMPLATE
        .replace("{{server_url}}", &escape_html(&state.server_url))
        .replace("{{connection_class}}", connection.as_str())
        .replace(
            "{{connection_status}}",
            if connection.is_connected() { "Connected" } else { "Disconnected" },
        )
        .replace(
            "{{last_update}}",
            &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        )
        .replace("{{food_count}}", &state.catalogue.len().to_string())
        .replace("{{total_calories}}", &totals.calories.to_string())
        .replace("{{total_protein}}", &totals.protein.to_string())
        .replace("{{total_carbs}}", &totals.carbs.to_string())
        .replace("{{food_cards}}", &cards)
        .replace("{{records}}", &records)
}

fn list(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = format!("<h3>{}</h3><ul>", escape_html(title));
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape_html(item));
    }
    out.push_str("</ul>");
    out
}

fn food_card(food: &FoodEntry) -> String {
    format!(
        r#"        <article class="card" id="food-{id}">
            <h2>{name}</h2>
            <div class="when">{meal} &middot; {time} &middot; {portion}</div>
            <div class="nutrients">
                <div><b>{calories}</b>kcal</div>
                <div><b>{protein}g</b>protein</div>
                <div><b>{carbs}g</b>carbs</div>
                <div><b>{fat}g</b>fat</div>
                <div><b>{fiber}g</b>fiber</div>
                <div><b>{sugar}g</b>sugar</div>
                <div><b>{sodium}mg</b>sodium</div>
                <div><b>{potassium}mg</b>potassium</div>
            </div>
            {benefits}{drawbacks}{alternatives}
            <div class="when">Glycemic index: {gi} &middot; Satiety: {satiety} &middot; Health score: {health}</div>
        </article>
"#,
        id = food.id,
        name = escape_html(&food.name),
        meal = food.meal_type,
        time = food.timestamp.format("%Y-%m-%d %H:%M"),
        portion = escape_html(&food.portion_size),
        calories = food.calories,
        protein = food.protein,
        carbs = food.carbs,
        fat = food.fat,
        fiber = food.fiber,
        sugar = food.sugar,
        sodium = food.sodium,
        potassium = food.potassium,
        benefits = list("Benefits", &food.benefits),
        drawbacks = list("Drawbacks", &food.drawbacks),
        alternatives = list("Alternatives", &food.alternatives),
        gi = escape_html(&food.glycemic_index),
        satiety = escape_html(&food.satiety_index),
        health = food.health_score,
    )
}

fn record_item(record: &ExtractedRecord) -> String {
    let food = record
        .food_item
        .as_deref()
        .map_or_else(|| "no food".to_string(), |f| format!("<b>{}</b>", escape_html(f)));
    let calories = record
        .calories
        .map(|c| format!(", {c} kcal"))
        .unwrap_or_default();

    format!(
        "            <li title=\"{raw}\"><span class=\"time\">{time}</span> {food}{calories}</li>\n",
        raw = escape_html(&record.raw_message),
        time = record.timestamp.format("%Y-%m-%d %H:%M:%S"),
    )
}
