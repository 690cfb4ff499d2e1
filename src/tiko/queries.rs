//! GraphQL documents sent to the Tiko API

use serde_json::json;

use super::client::Operation;

const LOG_IN: &str = r#"
mutation LogIn($email: String!, $password: String!, $langCode: String, $retainSession: Boolean) {
  logIn(input: { email: $email, password: $password, langCode: $langCode, retainSession: $retainSession }) {
    user {
      id
      properties {
        id
        allInstalled
        __typename
      }
      __typename
    }
    token
    firstLogin
    __typename
  }
}
"#;

const GET_PROPERTY_OVERVIEW: &str = r#"
query GET_PROPERTY_OVERVIEW_DECENTRALISED($id: Int!, $excludeRooms: [Int]) {
  settings {
    benchmark {
      isEnabled
      __typename
    }
    __typename
  }
  property(id: $id) {
    id
    mode
    mboxDisconnected
    isNetatmoAuthorised
    netatmoLinkAccountUrl
    isSinapsiEnabled
    isSinapsiAuthorised
    allInstalled
    ownerPermission
    constructionYear
    surfaceArea
    floors
    valueProposition
    address {
      id
      street
      number
      city
      zipCode
      __typename
    }
    tips {
      id
      tip
      __typename
    }
    ...CentralisedDevicesCompact
    rooms(excludeRooms: $excludeRooms) {
      id
      name
      type
      color
      heaters
      hasTemperatureSchedule
      currentTemperatureDegrees
      targetTemperatureDegrees
      humidity
      sensors
      devices {
        id
        code
        type
        name
        mac
        __typename
      }
      ...Status
      __typename
    }
    __typename
  }
}

fragment CentralisedDevicesCompact on PropertyType {
  devices(excludeDecentralised: true) {
    id
    code
    type
    name
    mac
    __typename
  }
  externalDevices {
    id
    name
    __typename
  }
  __typename
}

fragment Status on RoomType {
  status {
    disconnected
    heaterDisconnected
    heatingOperating
    sensorBatteryLow
    sensorDisconnected
    temporaryAdjustment
    __typename
  }
  __typename
}
"#;

const SET_PROPERTY_MODE: &str = r#"
mutation SET_PROPERTY_MODE($propertyId: Int!, $mode: String!) {
  setPropertyMode(input: { propertyId: $propertyId, mode: $mode }) {
    id
    mode
    __typename
  }
}
"#;

const SET_ROOM_ADJUST_TEMPERATURE: &str = r#"
mutation SET_PROPERTY_ROOM_ADJUST_TEMPERATURE($propertyId: Int!, $roomId: Int!, $temperature: Float!) {
  setRoomAdjustTemperature(input: { propertyId: $propertyId, roomId: $roomId, temperature: $temperature }) {
    id
    adjustTemperature {
      active
      endDateTime
      temperature
      __typename
    }
    __typename
  }
}
"#;

pub fn log_in(email: &str, password: &str) -> Operation {
    Operation {
        name: "LogIn",
        query: LOG_IN,
        variables: json!({
            "email": email,
            "password": password,
            "langCode": "fr",
            "retainSession": true
        }),
    }
}

pub fn property_overview(property_id: i64) -> Operation {
    Operation {
        name: "GET_PROPERTY_OVERVIEW_DECENTRALISED",
        query: GET_PROPERTY_OVERVIEW,
        variables: json!({ "id": property_id }),
    }
}

/// `mode` is passed through as-is; the vendor accepts "false" to clear
pub fn set_property_mode(property_id: i64, mode: &str) -> Operation {
    Operation {
        name: "SET_PROPERTY_MODE",
        query: SET_PROPERTY_MODE,
        variables: json!({ "propertyId": property_id, "mode": mode }),
    }
}

pub fn set_room_temperature(property_id: i64, room_id: i64, temperature: f64) -> Operation {
    Operation {
        name: "SET_PROPERTY_ROOM_ADJUST_TEMPERATURE",
        query: SET_ROOM_ADJUST_TEMPERATURE,
        variables: json!({
            "propertyId": property_id,
            "roomId": room_id,
            "temperature": temperature
        }),
    }
}

/// REST resource (not GraphQL) holding the consumption summary
pub fn consumption_path(property_id: i64) -> String {
    format!("api/v3/properties/{}/consumption_summary/", property_id)
}
