use crate::models::Pet;

/// The pet the user is currently swiping as
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActivePet {
    #[default]
    NoSelection,
    Selected(Pet),
}

impl ActivePet {
    pub fn pet(&self) -> Option<&Pet> {
        match self {
            ActivePet::Selected(pet) => Some(pet),
            ActivePet::NoSelection => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.pet().map(|p| p.id.as_str())
    }

    pub fn is_selected(&self, pet_id: &str) -> bool {
        self.id() == Some(pet_id)
    }
}
