use crate::dishes::dto::DishDto;

/// Client-side copy of the whole dish list.
#[derive(Debug, Clone, Default)]
pub struct DishCatalog {
    dishes: Vec<DishDto>,
}

impl DishCatalog {
    pub fn replace(&mut self, dishes: Vec<DishDto>) {
        self.dishes = dishes;
    }

    pub fn push(&mut self, dish: DishDto) {
        self.dishes.push(dish);
    }

    pub fn all(&self) -> &[DishDto] {
        &self.dishes
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn cuisines(&self) -> Vec<String> {
        distinct(self.dishes.iter().map(|d| d.cuisine.as_deref()))
    }

    pub fn flavors(&self) -> Vec<String> {
        distinct(self.dishes.iter().map(|d| d.flavor.as_deref()))
    }

    /// Exact-match filter. An empty value leaves that dimension open.
    pub fn filter(&self, cuisine: &str, flavor: &str) -> Vec<&DishDto> {
        self.dishes
            .iter()
            .filter(|d| cuisine.is_empty() || d.cuisine.as_deref() == Some(cuisine))
            .filter(|d| flavor.is_empty() || d.flavor.as_deref() == Some(flavor))
            .collect()
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values.flatten() {
        if !v.is_empty() && !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
pub(crate) fn sample_dish_dto(name: &str, cuisine: &str, flavor: &str) -> DishDto {
    DishDto {
        id: uuid::Uuid::new_v4(),
        name: name.into(),
        description: None,
        price: Some(38.0),
        cuisine: (!cuisine.is_empty()).then(|| cuisine.to_string()),
        flavor: (!flavor.is_empty()).then(|| flavor.to_string()),
        calories: Some(300.0),
        protein: Some(20.0),
        fat: None,
        carbohydrate: Some(30.0),
        fiber: None,
        sodium: None,
        cholesterol: None,
        ingredients: vec![],
        allergens: vec![],
        dietary_tags: vec![],
        health_benefits: vec![],
        health_warnings: vec![],
        rating: None,
        review_count: None,
        created_at: None,
    }
}
