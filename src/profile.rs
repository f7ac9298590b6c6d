//! The catalog of messages and native fields known to the encoder.
//!
//! Only the messages needed to describe an activity are included. Each message
//! type has a module of field number constants, named after the field.
//!
//! ```
//! let mut record = Message::new(MessageType::Record);
//! record.set_field(profile::record::TIMESTAMP, 1_000_000_000u32)?;
//! record.set_field(profile::record::HEART_RATE, 142u8)?;
//! ```

use crate::sans::data::BaseType;

/// Declaration of a native field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub number: u8,
    pub name: &'static str,
    pub base_type: BaseType,
}

macro_rules! messages {
    ($(
        $(#[$attr:meta])*
        $kind:ident = $global:literal, $module:ident {
            $($field:ident = $number:literal $name:literal $base:ident,)*
        }
    )*) => {
        /// A message type, discriminated by its global message number.
        #[repr(u16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum MessageType {
            $($(#[$attr])* $kind = $global,)*
        }

        impl MessageType {
            /// Every message type in the catalog.
            pub const ALL: &'static [MessageType] = &[$(MessageType::$kind,)*];

            /// Look up a message type by its global message number.
            pub fn from_global(global: u16) -> Option<Self> {
                match global {
                    $($global => Some(Self::$kind),)*
                    _ => None,
                }
            }

            /// Native fields declared for this message type.
            pub fn fields(self) -> &'static [FieldDef] {
                match self {
                    $(Self::$kind => &[$(FieldDef {
                        number: $number,
                        name: $name,
                        base_type: BaseType::$base,
                    },)*],)*
                }
            }
        }

        $(
            #[doc = concat!("Field numbers of [`MessageType::", stringify!($kind), "`].")]
            pub mod $module {
                $(pub const $field: u8 = $number;)*
            }
        )*
    };
}

messages! {
    /// Identifies the type and creator of a document.
    FileId = 0, file_id {
        TYPE = 0 "type" Enum,
        MANUFACTURER = 1 "manufacturer" Uint16,
        PRODUCT = 2 "product" Uint16,
        SERIAL_NUMBER = 3 "serial_number" Uint32z,
        TIME_CREATED = 4 "time_created" Uint32,
        NUMBER = 5 "number" Uint16,
        PRODUCT_NAME = 8 "product_name" String,
    }

    Session = 18, session {
        EVENT = 0 "event" Enum,
        EVENT_TYPE = 1 "event_type" Enum,
        START_TIME = 2 "start_time" Uint32,
        SPORT = 5 "sport" Enum,
        SUB_SPORT = 6 "sub_sport" Enum,
        TOTAL_ELAPSED_TIME = 7 "total_elapsed_time" Uint32,
        TOTAL_TIMER_TIME = 8 "total_timer_time" Uint32,
        TOTAL_DISTANCE = 9 "total_distance" Uint32,
        AVG_HEART_RATE = 16 "avg_heart_rate" Uint8,
        MAX_HEART_RATE = 17 "max_heart_rate" Uint8,
        FIRST_LAP_INDEX = 25 "first_lap_index" Uint16,
        NUM_LAPS = 26 "num_laps" Uint16,
        TIMESTAMP = 253 "timestamp" Uint32,
        MESSAGE_INDEX = 254 "message_index" Uint16,
    }

    Lap = 19, lap {
        EVENT = 0 "event" Enum,
        EVENT_TYPE = 1 "event_type" Enum,
        START_TIME = 2 "start_time" Uint32,
        TOTAL_ELAPSED_TIME = 7 "total_elapsed_time" Uint32,
        TOTAL_TIMER_TIME = 8 "total_timer_time" Uint32,
        TOTAL_DISTANCE = 9 "total_distance" Uint32,
        AVG_HEART_RATE = 15 "avg_heart_rate" Uint8,
        MAX_HEART_RATE = 16 "max_heart_rate" Uint8,
        TIMESTAMP = 253 "timestamp" Uint32,
        MESSAGE_INDEX = 254 "message_index" Uint16,
    }

    /// A sample of a time series.
    Record = 20, record {
        POSITION_LAT = 0 "position_lat" Sint32,
        POSITION_LONG = 1 "position_long" Sint32,
        ALTITUDE = 2 "altitude" Uint16,
        HEART_RATE = 3 "heart_rate" Uint8,
        CADENCE = 4 "cadence" Uint8,
        DISTANCE = 5 "distance" Uint32,
        SPEED = 6 "speed" Uint16,
        POWER = 7 "power" Uint16,
        TEMPERATURE = 13 "temperature" Sint8,
        TIMESTAMP = 253 "timestamp" Uint32,
    }

    Event = 21, event {
        EVENT = 0 "event" Enum,
        EVENT_TYPE = 1 "event_type" Enum,
        DATA16 = 2 "data16" Uint16,
        DATA = 3 "data" Uint32,
        EVENT_GROUP = 4 "event_group" Uint8,
        TIMESTAMP = 253 "timestamp" Uint32,
    }

    DeviceInfo = 23, device_info {
        DEVICE_INDEX = 0 "device_index" Uint8,
        DEVICE_TYPE = 1 "device_type" Uint8,
        MANUFACTURER = 2 "manufacturer" Uint16,
        SERIAL_NUMBER = 3 "serial_number" Uint32z,
        PRODUCT = 4 "product" Uint16,
        SOFTWARE_VERSION = 5 "software_version" Uint16,
        HARDWARE_VERSION = 6 "hardware_version" Uint8,
        CUM_OPERATING_TIME = 7 "cum_operating_time" Uint32,
        BATTERY_VOLTAGE = 10 "battery_voltage" Uint16,
        BATTERY_STATUS = 11 "battery_status" Uint8,
        DESCRIPTOR = 19 "descriptor" String,
        SOURCE_TYPE = 25 "source_type" Enum,
        PRODUCT_NAME = 27 "product_name" String,
        TIMESTAMP = 253 "timestamp" Uint32,
    }

    /// Summarizes a document's sessions.
    Activity = 34, activity {
        TOTAL_TIMER_TIME = 0 "total_timer_time" Uint32,
        NUM_SESSIONS = 1 "num_sessions" Uint16,
        TYPE = 2 "type" Enum,
        EVENT = 3 "event" Enum,
        EVENT_TYPE = 4 "event_type" Enum,
        LOCAL_TIMESTAMP = 5 "local_timestamp" Uint32,
        EVENT_GROUP = 6 "event_group" Uint8,
        TIMESTAMP = 253 "timestamp" Uint32,
    }

    /// Declares a developer field.
    FieldDescription = 206, field_description {
        DEVELOPER_DATA_INDEX = 0 "developer_data_index" Uint8,
        FIELD_DEFINITION_NUMBER = 1 "field_definition_number" Uint8,
        FIT_BASE_TYPE_ID = 2 "fit_base_type_id" Uint8,
        FIELD_NAME = 3 "field_name" String,
        UNITS = 8 "units" String,
        NATIVE_MESG_NUM = 14 "native_mesg_num" Uint16,
        NATIVE_FIELD_NUM = 15 "native_field_num" Uint8,
    }

    /// Declares an application contributing developer fields.
    DeveloperDataId = 207, developer_data_id {
        DEVELOPER_ID = 0 "developer_id" Byte,
        APPLICATION_ID = 1 "application_id" Byte,
        MANUFACTURER_ID = 2 "manufacturer_id" Uint16,
        DEVELOPER_DATA_INDEX = 3 "developer_data_index" Uint8,
        APPLICATION_VERSION = 4 "application_version" Uint32,
    }
}

impl MessageType {
    /// The global message number.
    pub fn global(self) -> u16 {
        self as u16
    }
}

/// Look up the declaration of a native field.
pub fn field(kind: MessageType, number: u8) -> Option<&'static FieldDef> {
    kind.fields().iter().find(|f| f.number == number)
}

/// Values of enumerated fields used when describing an activity.
pub mod types {
    pub const FILE_ACTIVITY: u8 = 4;
    pub const MANUFACTURER_DEVELOPMENT: u16 = 255;
    pub const DEVICE_INDEX_CREATOR: u8 = 0;

    pub const EVENT_TIMER: u8 = 0;
    pub const EVENT_TYPE_START: u8 = 0;
    pub const EVENT_TYPE_STOP_ALL: u8 = 4;

    pub const SPORT_GENERIC: u8 = 0;
    pub const SUB_SPORT_GENERIC: u8 = 0;
}

/// Seconds between the Unix epoch and the protocol's epoch, 1989-12-31T00:00Z.
pub const EPOCH_OFFSET: i64 = 631_065_600;

/// Convert a Unix timestamp to the protocol's `date_time` representation.
///
/// Returns `None` for instants outside the representable range.
pub fn timestamp_from_unix(seconds: i64) -> Option<u32> {
    u32::try_from(seconds - EPOCH_OFFSET).ok()
}
