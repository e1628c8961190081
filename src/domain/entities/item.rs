//! Item types, their field schemas, and the generic item record
//!
//! Every item category shares the same shape: a catalog-unique `id`, a
//! display `name`, and a fixed list of typed fields. Instead of one struct
//! per category, each [`ItemType`] owns a schema table and items are stored
//! as a single [`ItemRecord`] tagged with their type.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::domain::services::safe_json::{safe_bool, safe_int, safe_string};

/// Item categories the generator knows how to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
    Weapon,
    Ammo,
    Food,
    Drink,
    Material,
    WeaponComponent,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        Self::Weapon,
        Self::Ammo,
        Self::Food,
        Self::Drink,
        Self::Material,
        Self::WeaponComponent,
    ];

    /// Type discriminator used in prompts, logs, and template file names
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Ammo => "ammo",
            Self::Food => "food",
            Self::Drink => "drink",
            Self::Material => "material",
            Self::WeaponComponent => "weapon_component",
        }
    }

    /// Human-readable plural, used when asking the model for a list
    pub fn display_plural(&self) -> &'static str {
        match self {
            Self::Weapon => "weapons",
            Self::Ammo => "ammunition types",
            Self::Food => "food items",
            Self::Drink => "drinks",
            Self::Material => "crafting materials",
            Self::WeaponComponent => "weapon components",
        }
    }

    /// File name of this type's catalog inside the catalog directory
    pub fn catalog_file_name(&self) -> &'static str {
        match self {
            Self::Weapon => "weapons.json",
            Self::Ammo => "ammo.json",
            Self::Food => "food.json",
            Self::Drink => "drinks.json",
            Self::Material => "materials.json",
            Self::WeaponComponent => "weapon_components.json",
        }
    }

    /// Type-specific fields, in the order they are written to the catalog
    pub fn schema(&self) -> &'static [FieldSpec] {
        match self {
            Self::Weapon => WEAPON_FIELDS,
            Self::Ammo => AMMO_FIELDS,
            Self::Food => FOOD_FIELDS,
            Self::Drink => DRINK_FIELDS,
            Self::Material => MATERIAL_FIELDS,
            Self::WeaponComponent => WEAPON_COMPONENT_FIELDS,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown item type: {0}")]
pub struct UnknownItemType(pub String);

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "weapon" | "weapons" => Ok(Self::Weapon),
            "ammo" | "ammunition" => Ok(Self::Ammo),
            "food" | "foods" => Ok(Self::Food),
            "drink" | "drinks" => Ok(Self::Drink),
            "material" | "materials" => Ok(Self::Material),
            "weapon_component" | "weapon_components" | "component" | "components" => {
                Ok(Self::WeaponComponent)
            }
            _ => Err(UnknownItemType(s.to_string())),
        }
    }
}

/// Declared kind and default of a schema field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl FieldDefault {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Str(s) => Value::String((*s).to_string()),
            Self::Int(n) => Value::from(*n),
            Self::Bool(b) => Value::Bool(*b),
        }
    }
}

/// One type-specific field of an item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub default: FieldDefault,
}

const fn field(name: &'static str, default: FieldDefault) -> FieldSpec {
    FieldSpec { name, default }
}

use FieldDefault::{Bool, Int, Str};

const WEAPON_FIELDS: &[FieldSpec] = &[
    field("description", Str("")),
    field("category", Str("melee")),
    field("damage", Int(0)),
    field("durability", Int(100)),
    field("weight", Int(1)),
    field("value", Int(0)),
    field("ammo_type", Str("")),
    field("two_handed", Bool(false)),
];

const AMMO_FIELDS: &[FieldSpec] = &[
    field("description", Str("")),
    field("caliber", Str("")),
    field("damage_bonus", Int(0)),
    field("stack_size", Int(20)),
    field("weight", Int(0)),
    field("value", Int(0)),
];

const FOOD_FIELDS: &[FieldSpec] = &[
    field("description", Str("")),
    field("nutrition", Int(0)),
    field("spoil_hours", Int(0)),
    field("weight", Int(1)),
    field("value", Int(0)),
    field("cooked", Bool(false)),
];

const DRINK_FIELDS: &[FieldSpec] = &[
    field("description", Str("")),
    field("hydration", Int(0)),
    field("nutrition", Int(0)),
    field("weight", Int(1)),
    field("value", Int(0)),
    field("alcoholic", Bool(false)),
];

const MATERIAL_FIELDS: &[FieldSpec] = &[
    field("description", Str("")),
    field("rarity", Str("common")),
    field("weight", Int(1)),
    field("value", Int(0)),
    field("stack_size", Int(10)),
];

const WEAPON_COMPONENT_FIELDS: &[FieldSpec] = &[
    field("description", Str("")),
    field("slot", Str("")),
    field("compatible_with", Str("")),
    field("damage_modifier", Int(0)),
    field("durability_modifier", Int(0)),
    field("weight", Int(0)),
    field("value", Int(0)),
];

/// Why a proposed item object could not become an [`ItemRecord`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemRejection {
    #[error("item is not a JSON object")]
    NotAnObject,
    #[error("item has no id")]
    MissingId,
    #[error("item has no name")]
    MissingName,
}

/// A single accepted item of any category
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub item_type: ItemType,
    pub id: String,
    pub name: String,
    /// Schema fields in table order
    pub fields: Map<String, Value>,
}

impl ItemRecord {
    /// Build a record from an untrusted model-produced object.
    ///
    /// Type-specific fields fall back to their declared defaults; only a
    /// missing or blank `id` / `name` rejects the item. Unknown keys are
    /// dropped.
    pub fn from_untrusted(item_type: ItemType, value: &Value) -> Result<Self, ItemRejection> {
        if !value.is_object() {
            return Err(ItemRejection::NotAnObject);
        }

        let id = safe_string(value, "id", "").trim().to_string();
        if id.is_empty() {
            return Err(ItemRejection::MissingId);
        }

        let name = safe_string(value, "name", "").trim().to_string();
        if name.is_empty() {
            return Err(ItemRejection::MissingName);
        }

        let mut fields = Map::new();
        for spec in item_type.schema() {
            let extracted = match spec.default {
                Str(default) => Value::String(safe_string(value, spec.name, default)),
                Int(default) => Value::from(safe_int(value, spec.name, default)),
                Bool(default) => Value::Bool(safe_bool(value, spec.name, default)),
            };
            fields.insert(spec.name.to_string(), extracted);
        }

        Ok(Self {
            item_type,
            id,
            name,
            fields,
        })
    }

    /// Flat catalog representation: `id`, `name`, then the schema fields
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("id".to_string(), Value::String(self.id.clone()));
        object.insert("name".to_string(), Value::String(self.name.clone()));
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

#[cfg(test)]
impl ItemRecord {
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn get_int(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }
}
