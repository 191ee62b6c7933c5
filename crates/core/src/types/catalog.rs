//! Closed catalog vocabularies.
//!
//! Every enum here is stored as its canonical text form (the serde rename)
//! and round-trips through `Display`/`FromStr`, so repositories can keep the
//! columns as TEXT while handlers stay type-safe.

use serde::{Deserialize, Serialize};

/// Declare `as_str`, `Display`, and `FromStr` for a field-less enum.
///
/// The string forms must match the serde renames so that JSON payloads and
/// database text columns agree.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Canonical text form.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// All values, in declaration order.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                &[$(Self::$variant,)+]
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("invalid ", stringify!($name), ": {}"), other
                    )),
                }
            }
        }
    };
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rings,
    Necklaces,
    Earrings,
    Bracelets,
    Bangles,
    Mangalsutra,
    Anklets,
    Nosepins,
    Pendants,
    Chains,
    Watches,
    Other,
}

text_enum!(Category {
    Rings => "rings",
    Necklaces => "necklaces",
    Earrings => "earrings",
    Bracelets => "bracelets",
    Bangles => "bangles",
    Mangalsutra => "mangalsutra",
    Anklets => "anklets",
    Nosepins => "nosepins",
    Pendants => "pendants",
    Chains => "chains",
    Watches => "watches",
    Other => "other",
});

/// Product material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Gold,
    Silver,
    Platinum,
    Diamond,
    Pearl,
    Gemstone,
    Ruby,
    Titanium,
    Other,
}

text_enum!(Material {
    Gold => "gold",
    Silver => "silver",
    Platinum => "platinum",
    Diamond => "diamond",
    Pearl => "pearl",
    Gemstone => "gemstone",
    Ruby => "ruby",
    Titanium => "titanium",
    Other => "other",
});

impl Material {
    /// Whether products of this material must declare a [`Purity`].
    #[must_use]
    pub const fn requires_purity(&self) -> bool {
        matches!(self, Self::Gold | Self::Silver | Self::Platinum)
    }
}

/// Metal purity grade (karats for gold, fineness for silver/platinum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purity {
    #[serde(rename = "14k")]
    K14,
    #[serde(rename = "18k")]
    K18,
    #[serde(rename = "22k")]
    K22,
    #[serde(rename = "24k")]
    K24,
    #[serde(rename = "925")]
    F925,
    #[serde(rename = "950")]
    F950,
    #[serde(rename = "990")]
    F990,
    #[serde(rename = "999")]
    F999,
}

text_enum!(Purity {
    K14 => "14k",
    K18 => "18k",
    K22 => "22k",
    K24 => "24k",
    F925 => "925",
    F950 => "950",
    F990 => "990",
    F999 => "999",
});

/// Occasion a product is marketed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occasion {
    Wedding,
    Engagement,
    Festive,
    Party,
    #[serde(rename = "Daily Wear")]
    DailyWear,
    Gift,
    Office,
}

text_enum!(Occasion {
    Wedding => "Wedding",
    Engagement => "Engagement",
    Festive => "Festive",
    Party => "Party",
    DailyWear => "Daily Wear",
    Gift => "Gift",
    Office => "Office",
});

/// Audience a product is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductGender {
    Men,
    #[default]
    Women,
    Unisex,
    Kids,
}

text_enum!(ProductGender {
    Men => "Men",
    Women => "Women",
    Unisex => "Unisex",
    Kids => "Kids",
});

/// A shopper's stated gender, used for recommendations only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Unisex,
}

text_enum!(Gender {
    Men => "men",
    Women => "women",
    Unisex => "unisex",
});

/// Jewellery categories a shopper has expressed interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JewelleryInterest {
    Rings,
    Necklaces,
    Bracelets,
    Watches,
    Brooches,
    Anklets,
    Cufflinks,
    Earrings,
}

text_enum!(JewelleryInterest {
    Rings => "Rings",
    Necklaces => "Necklaces",
    Bracelets => "Bracelets",
    Watches => "Watches",
    Brooches => "Brooches",
    Anklets => "Anklets",
    Cufflinks => "Cufflinks",
    Earrings => "Earrings",
});

impl JewelleryInterest {
    /// Default interests assigned to a new account.
    #[must_use]
    pub const fn default_set() -> [Self; 2] {
        [Self::Rings, Self::Necklaces]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in Category::all() {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, *category);
        }
    }

    #[test]
    fn test_purity_text_forms() {
        assert_eq!(Purity::K22.as_str(), "22k");
        assert_eq!("925".parse::<Purity>().unwrap(), Purity::F925);
        assert!("23k".parse::<Purity>().is_err());
    }

    #[test]
    fn test_material_requires_purity() {
        assert!(Material::Gold.requires_purity());
        assert!(Material::Silver.requires_purity());
        assert!(Material::Platinum.requires_purity());
        assert!(!Material::Diamond.requires_purity());
        assert!(!Material::Pearl.requires_purity());
    }

    #[test]
    fn test_occasion_serde_matches_text() {
        let json = serde_json::to_string(&Occasion::DailyWear).unwrap();
        assert_eq!(json, "\"Daily Wear\"");
        assert_eq!("Daily Wear".parse::<Occasion>().unwrap(), Occasion::DailyWear);
    }

    #[test]
    fn test_gender_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Women).unwrap(), "\"women\"");
        assert_eq!("men".parse::<Gender>().unwrap(), Gender::Men);
    }
}
