use super::*;
use proptest::prelude::*;

fn product(title: &str, description: &str) -> Product {
    Product {
        id: None,
        title: title.to_string(),
        description: description.to_string(),
        image: None,
        price: None,
        locate: None,
    }
}

#[test]
fn test_fruits_and_corn_scenario() {
    let products = vec![
        product("Fruits", "Mango"),
        product("Fruits", "Mango"),
        product("Corn", "Yellow"),
    ];
    let hist = histogram_by_category(&products, &["Fruits", "Corn"]);

    assert_eq!(hist.len(), 2);
    assert_eq!(hist[0].category, "Fruits");
    assert_eq!(hist[0].counts.get("Mango"), Some(&2));
    assert_eq!(hist[0].counts.len(), 1);
    assert_eq!(hist[1].category, "Corn");
    assert_eq!(hist[1].counts.get("Yellow"), Some(&1));
}

#[test]
fn test_absent_category_yields_empty_histogram() {
    let products = vec![product("Corn", "White")];
    let hist = histogram_by_category(&products, &["Rice", "Corn"]);
    assert!(hist[0].is_empty());
    assert_eq!(hist[0].total(), 0);
    assert_eq!(hist[1].total(), 1);
}

#[test]
fn test_empty_inputs() {
    let none: Vec<Product> = Vec::new();
    let no_categories: [&str; 0] = [];
    assert!(histogram_by_category(&none, &no_categories).is_empty());
    let hist = histogram_by_category(&none, &["Corn"]);
    assert_eq!(hist.len(), 1);
    assert!(hist[0].is_empty());
}

#[test]
fn test_match_is_case_sensitive() {
    let products = vec![product("corn", "Yellow")];
    let hist = histogram_by_category(&products, &["Corn"]);
    assert!(hist[0].is_empty());
}

#[test]
fn test_trailing_space_is_a_different_category() {
    let products = vec![product("Fruits ", "Orange"), product("Fruits", "Mango")];
    let hist = histogram_by_category(&products, &["Fruits", "Fruits "]);
    assert_eq!(hist[0].counts.keys().collect::<Vec<_>>(), vec!["Mango"]);
    assert_eq!(hist[1].counts.keys().collect::<Vec<_>>(), vec!["Orange"]);
}

#[test]
fn test_descriptions_keep_first_seen_order() {
    let products = vec![
        product("Grains", "Sorghum"),
        product("Grains", "Millet"),
        product("Grains", "Sorghum"),
    ];
    let hist = histogram_by_category(&products, &["Grains"]);
    let order: Vec<(&String, &usize)> = hist[0].counts.iter().collect();
    assert_eq!(
        order,
        vec![(&"Sorghum".to_string(), &2), (&"Millet".to_string(), &1)]
    );
}

#[test]
fn test_owned_category_names_accepted() {
    let products = vec![product("Dairy", "Milk")];
    let categories = vec!["Dairy".to_string()];
    assert_eq!(histogram_by_category(&products, &categories)[0].total(), 1);
}

#[test]
fn test_unmatched_categories_lists_dropped_titles() {
    let products = vec![
        product("Fruits ", "Orange"),
        product("Corn", "Yellow"),
        product("Cassava", "Tuber"),
        product("Fruits ", "Pawpaw"),
    ];
    let missing = unmatched_categories(&products, &["Fruits", "Corn"]);
    assert_eq!(missing, vec!["Fruits ".to_string(), "Cassava".to_string()]);
}

fn arb_products() -> impl Strategy<Value = Vec<Product>> {
    let titles = prop::sample::select(vec!["Fruits", "Fruits ", "Corn", "corn", "Rice"]);
    let descriptions = prop::sample::select(vec!["Mango", "Yellow", "White", ""]);
    prop::collection::vec((titles, descriptions), 0..50)
        .prop_map(|rows| rows.into_iter().map(|(t, d)| product(t, d)).collect())
}

proptest! {
    #[test]
    fn output_aligned_with_categories(products in arb_products()) {
        let categories = ["Rice", "Fruits", "Corn", "Livestock"];
        let hist = histogram_by_category(&products, &categories);
        prop_assert_eq!(hist.len(), categories.len());
        for (h, c) in hist.iter().zip(categories.iter()) {
            prop_assert_eq!(h.category.as_str(), *c);
        }
    }

    #[test]
    fn totals_equal_exact_title_matches(products in arb_products()) {
        let categories = ["Fruits", "Fruits ", "Corn"];
        let hist = histogram_by_category(&products, &categories);
        for h in &hist {
            let expected = products.iter().filter(|p| p.title == h.category).count();
            prop_assert_eq!(h.total(), expected);
        }
    }
}
