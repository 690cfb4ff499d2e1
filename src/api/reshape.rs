//! Flattening of the property overview into the REST response shapes

use serde_json::{json, Map, Value};

use crate::models::Property;

/// `{slug: roomId}`
pub fn rooms(property: &Property) -> Map<String, Value> {
    property
        .rooms
        .iter()
        .map(|room| (room.slug(), json!(room.id)))
        .collect()
}

/// `{slug: {currentTemperature, targetTemperature, humidity, status}}`
pub fn sensors(property: &Property) -> Map<String, Value> {
    property
        .rooms
        .iter()
        .map(|room| {
            (
                room.slug(),
                json!({
                    "currentTemperature": room.current_temperature,
                    "targetTemperature": room.target_temperature,
                    "humidity": room.humidity,
                    "status": room.heating_active()
                }),
            )
        })
        .collect()
}

/// `{modeName: flag}`
pub fn modes(property: &Property) -> Map<String, Value> {
    property
        .modes()
        .map(|(name, flag)| (name.clone(), flag.clone()))
        .collect()
}

/// Modes followed by `{slug}_cur`, `{slug}_tar`, `{slug}_dry`, `{slug}_on` per room
pub fn summary(property: &Property) -> Map<String, Value> {
    let mut summary = modes(property);
    for room in &property.rooms {
        let slug = room.slug();
        summary.insert(format!("{}_cur", slug), room.current_temperature.clone());
        summary.insert(format!("{}_tar", slug), room.target_temperature.clone());
        summary.insert(format!("{}_dry", slug), room.humidity.clone());
        summary.insert(format!("{}_on", slug), json!(room.heating_active()));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Overview;

    fn property(data: Value) -> Property {
        serde_json::from_value::<Overview>(data).unwrap().property
    }

    fn living_room() -> Property {
        property(json!({
            "property": {
                "mode": { "boost": false },
                "rooms": [{
                    "id": 1,
                    "name": "Living Room",
                    "currentTemperatureDegrees": 21.5,
                    "targetTemperatureDegrees": 22,
                    "humidity": 45,
                    "status": { "heatingOperating": true }
                }]
            }
        }))
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            Value::Object(summary(&living_room())),
            json!({
                "boost": false,
                "living-room_cur": 21.5,
                "living-room_tar": 22,
                "living-room_dry": 45,
                "living-room_on": true
            })
        );
    }

    #[test]
    fn test_rooms_and_sensors() {
        let p = living_room();
        assert_eq!(Value::Object(rooms(&p)), json!({ "living-room": 1 }));
        assert_eq!(
            Value::Object(sensors(&p)),
            json!({
                "living-room": {
                    "currentTemperature": 21.5,
                    "targetTemperature": 22,
                    "humidity": 45,
                    "status": true
                }
            })
        );
    }

    #[test]
    fn test_missing_status_reports_false() {
        let p = property(json!({
            "property": { "rooms": [{ "id": 2, "name": "Garage" }] }
        }));

        assert_eq!(summary(&p)["garage_on"], json!(false));
        assert_eq!(sensors(&p)["garage"]["status"], json!(false));
        assert!(modes(&p).is_empty());
    }

    #[test]
    fn test_modes_keep_vendor_values() {
        let p = property(json!({
            "property": {
                "mode": { "boost": false, "frost": true, "absence": false, "disableHeating": false },
                "rooms": []
            }
        }));

        let m = modes(&p);
        assert_eq!(m.len(), 4);
        assert_eq!(m["frost"], json!(true));
        assert_eq!(m.keys().next().map(String::as_str), Some("boost"));
    }
}
