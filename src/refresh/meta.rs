use serde::Serialize;
use utoipa::ToSchema;

/// Display metadata for a device: name, location text, map coordinates.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeviceMeta {
    pub id: String,
    pub name: String,
    pub location: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Curated overrides for known stations. Devices not listed here fall back
/// to a prettified form of their id and no coordinates.
struct DeviceOverride {
    id: &'static str,
    name: &'static str,
    location: &'static str,
    lat: f64,
    lng: f64,
}

const DEVICE_OVERRIDES: &[DeviceOverride] = &[
    DeviceOverride {
        id: "bien_hoa",
        name: "Bien Hoa",
        location: "Bien Hoa, Dong Nai",
        lat: 10.9574,
        lng: 106.8427,
    },
    DeviceOverride {
        id: "binh_duong",
        name: "Binh Duong",
        location: "Binh Duong",
        lat: 11.3254,
        lng: 106.477,
    },
    DeviceOverride {
        id: "HoChiMinh_city",
        name: "Ho Chi Minh",
        location: "Ho Chi Minh City",
        lat: 10.8231,
        lng: 106.6297,
    },
    DeviceOverride {
        id: "demo_1",
        name: "Demo Long Xuyen",
        location: "Long Xuyen, An Giang",
        lat: 10.391_895,
        lng: 105.431_071,
    },
    DeviceOverride {
        id: "demo_2",
        name: "Demo Can Tho",
        location: "Can Tho",
        lat: 10.066_987,
        lng: 105.777_952,
    },
];

/// Title-case an id like `bien_hoa` into `Bien Hoa`.
fn prettify_id(id: &str) -> String {
    id.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve display metadata for a device id.
#[must_use]
pub fn device_meta(id: &str) -> DeviceMeta {
    if let Some(o) = DEVICE_OVERRIDES.iter().find(|o| o.id == id) {
        return DeviceMeta {
            id: id.to_string(),
            name: o.name.to_string(),
            location: o.location.to_string(),
            lat: Some(o.lat),
            lng: Some(o.lng),
        };
    }

    let name = prettify_id(id);
    DeviceMeta {
        id: id.to_string(),
        location: name.clone(),
        name,
        lat: None,
        lng: None,
    }
}
