//! Home Assistant configuration generator
//!
//! Renders the `tiko:` package (sensors, switches, thermostats, automations)
//! that wires Home Assistant to this gateway's REST endpoints.

use serde_json::{json, Map, Value};

use crate::models::{Overview, Room};

/// Placeholders for state values that must stay quoted in the output
const STATE_ON: &str = "{{ON}}";
const STATE_OFF: &str = "{{OFF}}";

const MODE_ATTRIBUTES: [&str; 4] = ["boost", "frost", "absence", "disableHeating"];

const CONSUMPTION_ATTRIBUTES: [&str; 5] = [
    "today_total_wh",
    "yesterday_total_same_time_wh",
    "last_month_total_wh",
    "this_month_total_wh",
    "last_month_total_same_day_wh",
];

/// Build the YAML document for `overview`, pointing at `base_url`
/// (e.g. `http://homeassistant.local:8080`).
pub fn render_configuration(
    overview: &Overview,
    base_url: &str,
) -> Result<String, serde_yaml::Error> {
    let api = format!("{}/api/v1", base_url.trim_end_matches('/'));

    let mut sensors = Vec::new();
    let mut binary_sensors = Vec::new();
    let mut climates = Vec::new();
    let mut automations = Vec::new();
    let mut shell_commands = Map::new();
    let mut settings_attributes: Vec<Value> = MODE_ATTRIBUTES.iter().map(|a| json!(a)).collect();

    for room in &overview.property.rooms {
        let slug = room.slug();

        sensors.extend(room_sensors(room, &slug));
        binary_sensors.push(template_sensor(
            &format!("{}_heating", slug),
            json!({
                "friendly_name": format!("{} heating", room.name),
                "value_template": format!("{{{{ is_state_attr('sensor.tiko_settings','{}_on', true)}}}}", slug),
                "device_class": "heat"
            }),
        ));
        automations.extend(room_automations(&slug));
        shell_commands.insert(
            format!("{}_set_temp", slug),
            json!(format!(
                "/usr/bin/curl -X PUT {}/{}/temperature?temp={{{{ state_attr(\"climate.{}\", \"temperature\") }}}}",
                api, room.id, slug
            )),
        );
        climates.push(json!({
            "platform": "generic_thermostat",
            "name": room.name,
            "heater": "switch.heaters_on_off",
            "target_sensor": format!("sensor.{}_temperature", slug)
        }));

        for suffix in ["cur", "tar", "dry", "on"] {
            settings_attributes.push(json!(format!("{}_{}", slug, suffix)));
        }
    }

    sensors.push(json!({
        "platform": "command_line",
        "name": "Tiko consumption",
        "json_attributes": CONSUMPTION_ATTRIBUTES,
        "command": format!("curl -s {}/consumption", api),
        "unit_of_measurement": "W",
        "scan_interval": 3600,
        "value_template": 1
    }));
    sensors.push(json!({
        "platform": "command_line",
        "name": "Tiko_settings",
        "json_attributes": settings_attributes,
        "command": format!("curl -s {}/summary", api),
        "scan_interval": 60,
        "value_template": 1
    }));

    let document = json!({
        "tiko": {
            "sensor": sensors,
            "binary_sensor": binary_sensors,
            "switch": mode_switches(&api),
            "climate": climates,
            "shell_command": shell_commands,
            "automation": automations,
        }
    });

    let yaml = serde_yaml::to_string(&document)?;
    Ok(quote_states(&yaml))
}

/// HA reads bare on/off as booleans; state conditions need the quoted strings
fn quote_states(yaml: &str) -> String {
    let mut out = yaml.to_string();
    for (placeholder, state) in [(STATE_ON, "'on'"), (STATE_OFF, "'off'")] {
        out = out
            .replace(&format!("'{}'", placeholder), state)
            .replace(&format!("\"{}\"", placeholder), state);
    }
    out
}

fn template_sensor(name: &str, body: Value) -> Value {
    let mut sensors = Map::new();
    sensors.insert(name.to_string(), body);
    json!({ "platform": "template", "sensors": sensors })
}

fn room_sensors(room: &Room, slug: &str) -> Vec<Value> {
    let attr = |suffix: &str| {
        format!(
            "{{{{ state_attr('sensor.tiko_settings', '{}_{}')}}}}",
            slug, suffix
        )
    };

    vec![
        template_sensor(
            &format!("{}_temperature", slug),
            json!({
                "friendly_name": format!("{} temperature", room.name),
                "value_template": attr("cur"),
                "unit_of_measurement": "°C",
                "device_class": "temperature"
            }),
        ),
        template_sensor(
            &format!("{}_temperature_target", slug),
            json!({
                "friendly_name": format!("{} temperature target", room.name),
                "value_template": attr("tar"),
                "unit_of_measurement": "°C",
                "device_class": "temperature"
            }),
        ),
        template_sensor(
            &format!("{}_humidity", slug),
            json!({
                "friendly_name": format!("{} humidity", room.name),
                "value_template": attr("dry"),
                "unit_of_measurement": "%",
                "device_class": "humidity"
            }),
        ),
    ]
}

fn startup_and_state_trigger(entity_id: &str) -> Value {
    json!([
        { "platform": "homeassistant", "event": "start" },
        { "platform": "state", "entity_id": entity_id }
    ])
}

fn room_automations(slug: &str) -> Vec<Value> {
    let heating = format!("binary_sensor.{}_heating", slug);
    let climate = format!("climate.{}", slug);
    let target = format!("sensor.{}_temperature_target", slug);

    let sync_status = |direction: &str, state: &str, service: &str| {
        json!({
            "id": format!("sync_status_{}_{}", direction, slug),
            "alias": format!("sync_status_{}_{}", direction, slug),
            "description": format!(
                "On HA startup or heater status change, check if heater is currently {} to update the climate object in HA",
                direction
            ),
            "trigger": startup_and_state_trigger(&heating),
            "condition": [{ "condition": "state", "entity_id": heating, "state": state }],
            "action": [{ "service": service, "target": { "entity_id": climate } }],
            "mode": "single"
        })
    };

    let mode_off = |switch: &str| {
        json!({ "condition": "state", "entity_id": switch, "state": STATE_OFF })
    };

    vec![
        sync_status("on", STATE_ON, "climate.turn_on"),
        sync_status("off", STATE_OFF, "climate.turn_off"),
        json!({
            "id": format!("sync_temp_{}", slug),
            "alias": format!("sync_temp_{}", slug),
            "description": "On HA startup or temp change, update the climate object in HA",
            "trigger": startup_and_state_trigger(&target),
            "condition": [],
            "action": [{
                "service": "climate.set_temperature",
                "target": { "entity_id": climate },
                "data": { "temperature": format!("{{{{ states('{}') }}}}", target) }
            }],
            "mode": "single"
        }),
        json!({
            "id": format!("set_temp_{}", slug),
            "alias": format!("set_temp_{}", slug),
            "description": "On climate update, send update command to endpoint",
            "trigger": [{ "platform": "state", "entity_id": climate, "attribute": "temperature" }],
            "condition": [{
                "condition": "and",
                "conditions": [
                    mode_off("switch.heaters_off"),
                    mode_off("switch.heaters_frost"),
                    mode_off("switch.heaters_absence")
                ]
            }],
            "action": [{ "service": format!("shell_command.{}_set_temp", slug) }],
            "mode": "single"
        }),
    ]
}

/// A command-line switch that toggles one global heating mode
struct ModeSwitch {
    id: &'static str,
    name: &'static str,
    mode_on: &'static str,
    mode_off: &'static str,
    /// Summary key reporting the switch state
    state_key: &'static str,
    icon_on: &'static str,
    icon_off: &'static str,
}

const SWITCHES: [ModeSwitch; 5] = [
    ModeSwitch {
        id: "heaters_on_off",
        name: "Heaters on/off",
        mode_on: "false",
        mode_off: "disableHeating",
        state_key: "disableHeating",
        icon_on: "mdi:radiator-off",
        icon_off: "mdi:radiator-off",
    },
    ModeSwitch {
        id: "heaters_off",
        name: "Heaters off",
        mode_on: "disableHeating",
        mode_off: "false",
        state_key: "disableHeating",
        icon_on: "mdi:radiator-off",
        icon_off: "mdi:radiator-off",
    },
    ModeSwitch {
        id: "heaters_boost",
        name: "Heaters boost",
        mode_on: "boost",
        mode_off: "false",
        state_key: "boost",
        icon_on: "mdi:sun-thermometer",
        icon_off: "mdi:lightning-bolt-outline",
    },
    ModeSwitch {
        id: "heaters_absence",
        name: "Heaters absence",
        mode_on: "absence",
        mode_off: "false",
        state_key: "absence",
        icon_on: "mdi:door-closed-lock",
        icon_off: "mdi:door",
    },
    ModeSwitch {
        id: "heaters_frost",
        name: "Heaters frost",
        mode_on: "frost",
        mode_off: "false",
        state_key: "frost",
        icon_on: "mdi:snowflake-thermometer",
        icon_off: "mdi:snowflake-thermometer",
    },
];

impl ModeSwitch {
    fn render(&self, api: &str) -> Value {
        let mut switches = Map::new();
        switches.insert(
            self.id.to_string(),
            json!({
                "friendly_name": self.name,
                "command_on": format!("curl -X PUT {}/mode/{}", api, self.mode_on),
                "command_off": format!("curl -X PUT {}/mode/{}", api, self.mode_off),
                "command_state": format!("curl -X GET {}/summary", api),
                "value_template": format!("{{{{value_json[\"{}\"]}}}}", self.state_key),
                "icon_template": format!(
                    "{{% if (value_json.{}) %}} {} {{% else %}} {} {{% endif %}}",
                    self.state_key, self.icon_on, self.icon_off
                )
            }),
        );
        json!({ "platform": "command_line", "switches": switches })
    }
}

fn mode_switches(api: &str) -> Vec<Value> {
    SWITCHES.iter().map(|switch| switch.render(api)).collect()
}
