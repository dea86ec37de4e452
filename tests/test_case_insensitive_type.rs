use recipe_extract::{extract_recipe, ExtractionMethod, MealType};

fn create_recipe_html(json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#
    )
}

async fn serve(json_ld: &str) -> (mockito::ServerGuard, String) {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipe")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(create_recipe_html(json_ld))
        .create_async()
        .await;
    let url = format!("{}/recipe", server.url());
    (server, url)
}

#[tokio::test]
async fn test_lowercase_recipe_type() {
    // Test case where @type is "recipe" instead of "Recipe"
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "recipe",
        "name": "Easy Black Bean Soup",
        "image": "https://example.com/blackbean.jpg",
        "description": "This black bean soup recipe is easy to make and full of flavor.",
        "prepTime": "PT10M",
        "cookTime": "PT30M",
        "recipeYield": "6",
        "recipeIngredient": [
            "2 cans black beans",
            "1 onion, diced",
            "2 cloves garlic, minced",
            "1 tsp cumin",
            "4 cups vegetable broth",
            "Salt and pepper to taste"
        ],
        "recipeInstructions": [
            "Sauté onion and garlic until soft.",
            "Add cumin and cook for 1 minute.",
            "Add beans and broth, simmer for 20 minutes.",
            "Season with salt and pepper."
        ]
    }
    "#;
    let (_server, url) = serve(json_ld).await;

    let draft = extract_recipe(&url).await.unwrap();

    // Parsed despite lowercase @type
    assert_eq!(draft.name, "Easy Black Bean Soup");
    assert_eq!(draft.ingredients.len(), 6);
    assert_eq!(draft.ingredients[0], "2 cans black beans");
    assert_eq!(draft.steps.len(), 4);
    assert_eq!(draft.steps[3], "Season with salt and pepper.");
    assert_eq!(draft.total_minutes, Some(40));
    assert_eq!(draft.servings, Some(6));
    assert_eq!(draft.meal_type, MealType::Main);
    assert_eq!(draft.extraction_method, ExtractionMethod::Structured);
    assert_eq!(
        draft.image_url.unwrap().as_str(),
        "https://example.com/blackbean.jpg"
    );
}

#[tokio::test]
async fn test_uppercase_recipe_type() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "RECIPE",
        "name": "Crème brûlée",
        "recipeIngredient": ["50 cl de crème", "5 jaunes d'oeufs", "100 g de sucre"],
        "recipeInstructions": "Mélanger.\nCuire au bain-marie.\nCaraméliser."
    }
    "#;
    let (_server, url) = serve(json_ld).await;

    let draft = extract_recipe(&url).await.unwrap();

    assert_eq!(draft.name, "Crème brûlée");
    assert_eq!(draft.steps, vec!["Mélanger.", "Cuire au bain-marie.", "Caraméliser."]);
    assert_eq!(draft.meal_type, MealType::Dessert);
}

#[tokio::test]
async fn test_type_array_and_iri_in_graph() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebPage", "name": "Page"},
            {
                "@type": ["http://schema.org/Recipe"],
                "name": "Velouté de potiron",
                "recipeIngredient": ["1 potiron", "1 oignon"],
                "recipeInstructions": [{"@type": "HowToStep", "text": "Mixer."}]
            }
        ]
    }
    "#;
    let (_server, url) = serve(json_ld).await;

    let draft = extract_recipe(&url).await.unwrap();

    assert_eq!(draft.name, "Velouté de potiron");
    assert_eq!(draft.steps, vec!["Mixer."]);
    assert_eq!(draft.extraction_method, ExtractionMethod::Structured);
}
