//! Static catalogs: building parts, city assets and solar-system objects.
//!
//! Each family is a closed enum with a lookup table from variant to its
//! [`VisualSpec`].  String keys only exist at the input boundary, where
//! [`std::str::FromStr`] rejects anything not in the table.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Visual spec
// ════════════════════════════════════════════════════════════════════════════

/// Linear RGB, components 0.0–1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const CYAN: Color = Color([0.22, 0.74, 0.97]);

    /// Pack as opaque 0xAARRGGBB.
    pub fn to_argb(self) -> u32 {
        let [r, g, b] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u32);
        0xFF00_0000 | (r << 16) | (g << 8) | b
    }
}

/// Geometry family the renderer draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Cube,
    Block,
    CityAsset,
    Sphere,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectSize {
    /// Full extents along X, Y, Z.
    Extents(Vec3),
    Radius(f32),
}

impl ObjectSize {
    /// Largest horizontal footprint, for previews.
    pub fn footprint(&self) -> f32 {
        match *self {
            ObjectSize::Extents(e) => e.x.max(e.z),
            ObjectSize::Radius(r)  => r * 2.0,
        }
    }
}

/// Resolved attributes of whatever the current mode would build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualSpec {
    pub name:  &'static str,
    pub shape: Shape,
    pub size:  ObjectSize,
    pub color: Color,
}

// ════════════════════════════════════════════════════════════════════════════
// Unknown keys
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownKey {
    pub family: &'static str,
    pub key:    String,
}

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not in the {} catalog", self.key, self.family)
    }
}

impl std::error::Error for UnknownKey {}

// One macro per family keeps key, table and parser in a single place.
macro_rules! catalog {
    (
        $(#[$meta:meta])*
        $name:ident, $family:literal, $shape:expr, {
            $($variant:ident => $key:literal, $display:literal, $size:expr, [$r:expr, $g:expr, $b:expr];)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name { $($variant,)+ }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];
            pub const FAMILY: &'static str = $family;

            pub fn key(self) -> &'static str {
                match self { $($name::$variant => $key,)+ }
            }

            pub fn spec(self) -> VisualSpec {
                match self {
                    $($name::$variant => VisualSpec {
                        name:  $display,
                        shape: $shape,
                        size:  $size,
                        color: Color([$r, $g, $b]),
                    },)+
                }
            }

            /// The entry after `self`, wrapping.
            pub fn next(self) -> Self {
                let i = Self::ALL.iter().position(|&v| v == self).unwrap_or(0);
                Self::ALL[(i + 1) % Self::ALL.len()]
            }

            /// The entry before `self`, wrapping.
            pub fn prev(self) -> Self {
                let i = Self::ALL.iter().position(|&v| v == self).unwrap_or(0);
                Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
            }
        }

        impl FromStr for $name {
            type Err = UnknownKey;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($key => Ok($name::$variant),)+
                    _ => Err(UnknownKey { family: $family, key: s.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.spec().name)
            }
        }
    };
}

fn ext(x: f32, y: f32, z: f32) -> ObjectSize { ObjectSize::Extents(Vec3::new(x, y, z)) }

catalog! {
    /// Structural parts for houses and towers.
    BuildingPart, "building parts", Shape::Block, {
        Wall    => "wall",    "Wall",    ext(3.0, 2.0, 0.3), [0.76, 0.60, 0.42];
        Window  => "window",  "Window",  ext(1.5, 1.5, 0.2), [0.53, 0.81, 0.92];
        Door    => "door",    "Door",    ext(1.2, 2.0, 0.2), [0.55, 0.27, 0.07];
        Roof    => "roof",    "Roof",    ext(4.0, 0.3, 4.0), [0.86, 0.08, 0.24];
        Floor   => "floor",   "Floor",   ext(4.0, 0.2, 4.0), [0.41, 0.41, 0.41];
        Column  => "column",  "Column",  ext(0.4, 3.0, 0.4), [0.83, 0.83, 0.83];
        Stairs  => "stairs",  "Stairs",  ext(2.0, 1.0, 3.0), [0.66, 0.66, 0.66];
        Balcony => "balcony", "Balcony", ext(3.0, 0.2, 1.5), [0.44, 0.50, 0.56];
    }
}

catalog! {
    /// Street furniture and buildings for the city builder.
    CityAsset, "city assets", Shape::CityAsset, {
        Road        => "road",        "Road",        ext(2.0, 0.1, 2.0), [0.25, 0.25, 0.28];
        Apartment   => "apartment",   "Apartment",   ext(2.0, 6.0, 2.0), [0.70, 0.66, 0.60];
        House       => "house",       "House",       ext(2.0, 2.0, 2.0), [0.85, 0.55, 0.40];
        Skyscraper  => "skyscraper",  "Skyscraper",  ext(2.0, 12.0, 2.0), [0.55, 0.65, 0.75];
        Shop        => "shop",        "Shop",        ext(2.0, 1.5, 2.0), [0.95, 0.75, 0.30];
        Streetlight => "streetlight", "Streetlight", ext(0.2, 3.0, 0.2), [0.90, 0.90, 0.60];
        Bench       => "bench",       "Bench",       ext(1.2, 0.5, 0.4), [0.50, 0.35, 0.20];
        Tree        => "tree",        "Tree",        ext(1.0, 3.0, 1.0), [0.20, 0.60, 0.25];
        Grass       => "grass",       "Grass",       ext(2.0, 0.05, 2.0), [0.35, 0.75, 0.30];
        Fountain    => "fountain",    "Fountain",    ext(1.8, 1.0, 1.8), [0.60, 0.80, 0.95];
        Car         => "car",         "Car",         ext(1.8, 0.8, 0.9), [0.80, 0.15, 0.15];
        Person      => "person",      "Person",      ext(0.4, 1.7, 0.4), [0.95, 0.80, 0.65];
        Sun         => "sun",         "Sun",         ext(1.5, 1.5, 1.5), [0.99, 0.72, 0.07];
    }
}

catalog! {
    /// Planets and friends, drawn as spheres.
    SolarObject, "solar objects", Shape::Sphere, {
        Sun      => "sun",      "Sun",      ObjectSize::Radius(3.0), [0.99, 0.72, 0.07];
        Mercury  => "mercury",  "Mercury",  ObjectSize::Radius(0.4), [0.55, 0.47, 0.33];
        Venus    => "venus",    "Venus",    ObjectSize::Radius(0.9), [1.00, 0.78, 0.29];
        Earth    => "earth",    "Earth",    ObjectSize::Radius(1.0), [0.25, 0.41, 0.88];
        Moon     => "moon",     "Moon",     ObjectSize::Radius(0.3), [0.75, 0.75, 0.75];
        Mars     => "mars",     "Mars",     ObjectSize::Radius(0.5), [0.80, 0.36, 0.36];
        Jupiter  => "jupiter",  "Jupiter",  ObjectSize::Radius(2.5), [0.85, 0.65, 0.13];
        Saturn   => "saturn",   "Saturn",   ObjectSize::Radius(2.0), [0.96, 0.64, 0.38];
        Uranus   => "uranus",   "Uranus",   ObjectSize::Radius(1.5), [0.31, 0.82, 0.91];
        Neptune  => "neptune",  "Neptune",  ObjectSize::Radius(1.4), [0.25, 0.40, 0.96];
        Asteroid => "asteroid", "Asteroid", ObjectSize::Radius(0.2), [0.50, 0.50, 0.50];
        Comet    => "comet",    "Comet",    ObjectSize::Radius(0.3), [0.88, 0.88, 0.88];
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CatalogKey — a selection in any family
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKey {
    Part(BuildingPart),
    City(CityAsset),
    Solar(SolarObject),
}

impl CatalogKey {
    pub fn key(self) -> &'static str {
        match self {
            CatalogKey::Part(p)  => p.key(),
            CatalogKey::City(c)  => c.key(),
            CatalogKey::Solar(s) => s.key(),
        }
    }

    pub fn spec(self) -> VisualSpec {
        match self {
            CatalogKey::Part(p)  => p.spec(),
            CatalogKey::City(c)  => c.spec(),
            CatalogKey::Solar(s) => s.spec(),
        }
    }

    pub fn family(self) -> &'static str {
        match self {
            CatalogKey::Part(_)  => BuildingPart::FAMILY,
            CatalogKey::City(_)  => CityAsset::FAMILY,
            CatalogKey::Solar(_) => SolarObject::FAMILY,
        }
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_back() {
        for &p in BuildingPart::ALL { assert_eq!(p.key().parse::<BuildingPart>(), Ok(p)); }
        for &c in CityAsset::ALL    { assert_eq!(c.key().parse::<CityAsset>(), Ok(c)); }
        for &s in SolarObject::ALL  { assert_eq!(s.key().parse::<SolarObject>(), Ok(s)); }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(" Wall ".parse::<BuildingPart>(), Ok(BuildingPart::Wall));
        assert_eq!("EARTH".parse::<SolarObject>(), Ok(SolarObject::Earth));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "spaceship".parse::<CityAsset>().unwrap_err();
        assert_eq!(err.family, "city assets");
        assert_eq!(err.key, "spaceship");
    }

    #[test]
    fn catalog_sizes() {
        assert_eq!(BuildingPart::ALL.len(), 8);
        assert_eq!(CityAsset::ALL.len(), 13);
        assert_eq!(SolarObject::ALL.len(), 12);
    }

    #[test]
    fn solar_objects_are_spheres() {
        for &s in SolarObject::ALL {
            assert_eq!(s.spec().shape, Shape::Sphere);
            assert!(matches!(s.spec().size, ObjectSize::Radius(_)));
        }
    }

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(BuildingPart::Balcony.next(), BuildingPart::Wall);
        assert_eq!(BuildingPart::Wall.prev(), BuildingPart::Balcony);
        assert_eq!(SolarObject::Earth.next().prev(), SolarObject::Earth);
    }

    #[test]
    fn color_packs_opaque() {
        assert_eq!(Color([1.0, 0.0, 0.0]).to_argb(), 0xFFFF0000);
        assert_eq!(Color([0.0, 0.0, 1.0]).to_argb() >> 24, 0xFF);
    }
}
