use crate::users::dto::{UserDto, UserPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagKind {
    Cuisine,
    Flavor,
    Ingredient,
    Allergy,
    Disease,
    DietaryRestriction,
}

impl TagKind {
    pub const ALL: [TagKind; 6] = [
        TagKind::Cuisine,
        TagKind::Flavor,
        TagKind::Ingredient,
        TagKind::Allergy,
        TagKind::Disease,
        TagKind::DietaryRestriction,
    ];

    /// Page container the list is drawn into. Only cuisines, flavors and
    /// allergies have one; the rest are edited without a widget.
    pub fn container_id(self) -> Option<&'static str> {
        match self {
            TagKind::Cuisine => Some("cuisine-tags"),
            TagKind::Flavor => Some("flavor-tags"),
            TagKind::Allergy => Some("allergy-tags"),
            _ => None,
        }
    }

    pub fn from_container(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.container_id() == Some(id))
    }

    pub fn label(self) -> &'static str {
        match self {
            TagKind::Cuisine => "cuisines",
            TagKind::Flavor => "flavors",
            TagKind::Ingredient => "ingredients",
            TagKind::Allergy => "allergies",
            TagKind::Disease => "diseases",
            TagKind::DietaryRestriction => "dietary restrictions",
        }
    }
}

/// Ordered list of distinct, non-blank tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    items: Vec<String>,
}

impl TagList {
    /// Adds the trimmed value. Returns false when it was blank or already
    /// present.
    pub fn submit(&mut self, raw: &str) -> bool {
        let value = raw.trim();
        if value.is_empty() || self.items.iter().any(|t| t == value) {
            return false;
        }
        self.items.push(value.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<String>> for TagList {
    fn from(values: Vec<String>) -> Self {
        let mut list = TagList::default();
        for v in &values {
            list.submit(v);
        }
        list
    }
}

/// The six preference lists edited on the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    cuisines: TagList,
    flavors: TagList,
    ingredients: TagList,
    allergies: TagList,
    diseases: TagList,
    dietary_restrictions: TagList,
}

impl Preferences {
    pub fn from_user(user: &UserDto) -> Self {
        Self {
            cuisines: user.preferred_cuisines.clone().into(),
            flavors: user.preferred_flavors.clone().into(),
            ingredients: user.preferred_ingredients.clone().into(),
            allergies: user.allergies.clone().into(),
            diseases: user.diseases.clone().into(),
            dietary_restrictions: user.dietary_restrictions.clone().into(),
        }
    }

    pub fn get(&self, kind: TagKind) -> &TagList {
        match kind {
            TagKind::Cuisine => &self.cuisines,
            TagKind::Flavor => &self.flavors,
            TagKind::Ingredient => &self.ingredients,
            TagKind::Allergy => &self.allergies,
            TagKind::Disease => &self.diseases,
            TagKind::DietaryRestriction => &self.dietary_restrictions,
        }
    }

    pub fn get_mut(&mut self, kind: TagKind) -> &mut TagList {
        match kind {
            TagKind::Cuisine => &mut self.cuisines,
            TagKind::Flavor => &mut self.flavors,
            TagKind::Ingredient => &mut self.ingredients,
            TagKind::Allergy => &mut self.allergies,
            TagKind::Disease => &mut self.diseases,
            TagKind::DietaryRestriction => &mut self.dietary_restrictions,
        }
    }

    pub fn clear_all(&mut self) {
        for kind in TagKind::ALL {
            self.get_mut(kind).clear();
        }
    }

    /// Copies every list into the payload, empty ones included.
    pub fn apply_to(&self, payload: &mut UserPayload) {
        let list = |k| Some(self.get(k).items().to_vec());
        payload.preferred_cuisines = list(TagKind::Cuisine);
        payload.preferred_flavors = list(TagKind::Flavor);
        payload.preferred_ingredients = list(TagKind::Ingredient);
        payload.allergies = list(TagKind::Allergy);
        payload.diseases = list(TagKind::Disease);
        payload.dietary_restrictions = list(TagKind::DietaryRestriction);
    }
}
