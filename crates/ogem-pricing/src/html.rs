use std::sync::OnceLock;

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};

use crate::extract::extract_price;
use crate::types::ModelPrice;

/// Containers that usually hold pricing tables
const CONTAINER_SELECTORS: &[&str] = &[
    "table",
    "[class*=\"pricing\"]",
    "[class*=\"table\"]",
    "[data-testid*=\"pricing\"]",
    ".pricing-table",
    ".model-pricing",
];

/// Words that mark a header row rather than a model row
const HEADER_WORDS: &[&str] = &["model", "input", "pricing"];

struct Selectors {
    containers: Vec<Selector>,
    rows: Selector,
    cells: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        containers: CONTAINER_SELECTORS
            .iter()
            .map(|s| Selector::parse(s).expect("must be valid selector"))
            .collect(),
        rows: Selector::parse("tr, div").expect("must be valid selector"),
        cells: Selector::parse("td, th, div, span").expect("must be valid selector"),
    })
}

/// Extract model prices from a pricing page
///
/// A row qualifies when it has at least three cells, its first cell names a
/// model containing one of `keywords`, and the second and third cells parse as
/// input and output prices. The lowercase model text is used as the key.
pub fn parse_pricing_table(html: &str, keywords: &[&str], source: &str) -> IndexMap<String, ModelPrice> {
    let document = Html::parse_document(html);
    let selectors = selectors();
    let mut models = IndexMap::new();

    for container_selector in &selectors.containers {
        for container in document.select(container_selector) {
            for row in container.select(&selectors.rows) {
                let cells: Vec<ElementRef<'_>> = row.select(&selectors.cells).collect();
                if cells.len() < 3 {
                    continue;
                }

                let model = cell_text(cells[0]).to_lowercase();
                if HEADER_WORDS.iter().any(|word| model.contains(word)) {
                    continue;
                }
                if !keywords.iter().any(|keyword| model.contains(keyword)) {
                    continue;
                }

                let (Some(input), Some(output)) = (
                    extract_price(&cell_text(cells[1])),
                    extract_price(&cell_text(cells[2])),
                ) else {
                    continue;
                };

                models.insert(
                    model,
                    ModelPrice {
                        input_price_per_1m: input,
                        output_price_per_1m: output,
                        reasoning_price_per_1m: None,
                        source: source.to_owned(),
                    },
                );
            }
        }
    }

    models
}

/// Concatenated, whitespace-trimmed text of an element
fn cell_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}
