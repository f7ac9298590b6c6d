//! A synthetic activity: a timer, one lap of heart rate samples and summaries.

use std::f64::consts::TAU;

use anyhow::{Context, Result};
use chainring::{
    avec::ToMessage,
    developer::{DeveloperDataId, FieldDescription},
    message::{BaseType, Message, Value},
    profile::{MessageType, record, types},
};
use rand::Rng;

/// It is recommended to reuse the same identifier for every document written
/// by an application.
pub const APPLICATION_ID: [u8; 16] = [
    0x01, 0x01, 0x02, 0x03, 0x05, 0x08, 0x0D, 0x15, 0x22, 0x37, 0x59, 0x90, 0xE9, 0x79, 0x62, 0xDB,
];

const MIN_HEART_RATE: u8 = 103;
const MAX_HEART_RATE: u8 = 145;

pub struct Settings {
    pub samples: u32,
    /// Start of the activity, as a FIT timestamp.
    pub start: u32,
    /// Offset of local time from UTC, in seconds.
    pub utc_offset: i32,
    pub serial_number: u32,
}

#[derive(Debug, ToMessage)]
#[message(FileId)]
struct FileId {
    #[field(0)]
    kind: Option<u8>,
    #[field(1)]
    manufacturer: Option<u16>,
    #[field(2)]
    product: Option<u16>,
    #[field(3)]
    serial_number: Option<u32>,
    #[field(4)]
    time_created: Option<u32>,
}

#[derive(Debug, ToMessage)]
#[message(DeviceInfo)]
struct DeviceInfo {
    #[field(0)]
    device_index: Option<u8>,
    #[field(2)]
    manufacturer: Option<u16>,
    #[field(3)]
    serial_number: Option<u32>,
    #[field(4)]
    product: Option<u16>,
    #[field(5, |v| v.map(|v| (v * 100.0).round() as u16))]
    software_version: Option<f32>,
    #[field(27)]
    product_name: Option<String>,
    #[field(253)]
    timestamp: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
enum Timer {
    Start,
    StopAll,
}

#[derive(Debug, ToMessage)]
#[message(Event)]
struct TimerEvent {
    #[field(0, |_| Some(types::EVENT_TIMER))]
    #[field(1, |t| match t {
        Timer::Start => Some(types::EVENT_TYPE_START),
        Timer::StopAll => Some(types::EVENT_TYPE_STOP_ALL),
    })]
    timer: Timer,
    #[field(253)]
    timestamp: Option<u32>,
}

/// Durations are written in milliseconds.
fn millis(seconds: &Option<f32>) -> Option<u32> {
    seconds.map(|s| (s * 1000.0).round() as u32)
}

#[derive(Debug, ToMessage)]
#[message(Lap)]
struct Lap {
    #[field(2)]
    start_time: Option<u32>,
    #[field(7, |v| millis(v))]
    total_elapsed_time: Option<f32>,
    #[field(8, |v| millis(v))]
    total_timer_time: Option<f32>,
    #[field(253)]
    timestamp: Option<u32>,
    #[field(254)]
    message_index: Option<u16>,
}

#[derive(Debug, ToMessage)]
#[message(Session)]
struct Session {
    #[field(2)]
    start_time: Option<u32>,
    #[field(5)]
    sport: Option<u8>,
    #[field(6)]
    sub_sport: Option<u8>,
    #[field(7, |v| millis(v))]
    total_elapsed_time: Option<f32>,
    #[field(8, |v| millis(v))]
    total_timer_time: Option<f32>,
    #[field(25)]
    first_lap_index: Option<u16>,
    #[field(26)]
    num_laps: Option<u16>,
    #[field(253)]
    timestamp: Option<u32>,
    #[field(254)]
    message_index: Option<u16>,
}

#[derive(Debug, ToMessage)]
#[message(Activity)]
struct Activity {
    #[field(0, |v| millis(v))]
    total_timer_time: Option<f32>,
    #[field(1)]
    num_sessions: Option<u16>,
    #[field(5)]
    local_timestamp: Option<u32>,
    #[field(253)]
    timestamp: Option<u32>,
}

/// Build the messages of an activity, in the order they are to be written.
pub fn messages(settings: &Settings, rng: &mut impl Rng) -> Result<Vec<Message>> {
    let start = settings.start;
    let mut messages = Vec::new();

    messages.push(
        FileId {
            kind: Some(types::FILE_ACTIVITY),
            manufacturer: Some(types::MANUFACTURER_DEVELOPMENT),
            product: Some(0),
            serial_number: Some(settings.serial_number),
            time_created: Some(start),
        }
        .to_message()?,
    );

    messages.push(
        DeviceInfo {
            device_index: Some(types::DEVICE_INDEX_CREATOR),
            manufacturer: Some(types::MANUFACTURER_DEVELOPMENT),
            serial_number: Some(settings.serial_number),
            product: Some(0),
            software_version: Some(1.0),
            product_name: Some("FIT Cookbook".into()),
            timestamp: Some(start),
        }
        .to_message()?,
    );

    messages.push(
        TimerEvent {
            timer: Timer::Start,
            timestamp: Some(start),
        }
        .to_message()?,
    );

    let developer = DeveloperDataId::new(APPLICATION_ID, 0);

    let doughnuts = FieldDescription::new(0, 0, BaseType::Float32)
        .with_name("doughnuts_earned")
        .with_units("doughnuts")
        .with_native(MessageType::Session, None);

    let heart_rate = FieldDescription::new(0, 1, BaseType::Uint8)
        .with_name("Heart Rate")
        .with_units("bpm")
        .with_native(MessageType::Record, Some(record::HEART_RATE));

    messages.push(developer.to_message()?);
    messages.push(doughnuts.to_message()?);
    messages.push(heart_rate.to_message()?);

    let mut previous = rng.random_range(MIN_HEART_RATE..=MAX_HEART_RATE);

    for i in 0..settings.samples {
        // A random walk, at most two beats from the previous sample.
        let lower = MIN_HEART_RATE.max(previous.saturating_sub(2));
        let upper = MAX_HEART_RATE.min(previous + 2);
        previous = rng.random_range(lower..=upper);

        // A sine wave, scaled to the range of a byte.
        let wave = ((TAU * (0.01 * i as f64 + 10.0)).sin() + 1.0) * 127.0;

        let mut m = Message::new(MessageType::Record);
        m.set_field(record::TIMESTAMP, start + i)?
            .set_field(record::HEART_RATE, previous)?
            .add_developer_field(&heart_rate, &developer, Some(Value::U8(wave as u8)))?;
        messages.push(m);
    }

    let end = start + settings.samples;
    let elapsed = settings.samples as f32;

    messages.push(
        TimerEvent {
            timer: Timer::StopAll,
            timestamp: Some(end),
        }
        .to_message()?,
    );

    messages.push(
        Lap {
            start_time: Some(start),
            total_elapsed_time: Some(elapsed),
            total_timer_time: Some(elapsed),
            timestamp: Some(end),
            message_index: Some(0),
        }
        .to_message()?,
    );

    let mut session = Session {
        start_time: Some(start),
        sport: Some(types::SPORT_GENERIC),
        sub_sport: Some(types::SUB_SPORT_GENERIC),
        total_elapsed_time: Some(elapsed),
        total_timer_time: Some(elapsed),
        first_lap_index: Some(0),
        num_laps: Some(1),
        timestamp: Some(end),
        message_index: Some(0),
    }
    .to_message()?;
    session.add_developer_field(&doughnuts, &developer, Some(Value::F32(elapsed / 1200.0)))?;
    messages.push(session);

    let local_timestamp = u32::try_from(end as i64 + settings.utc_offset as i64)
        .context("Local time is outside the range of FIT timestamps")?;

    messages.push(
        Activity {
            total_timer_time: Some(elapsed),
            num_sessions: Some(1),
            local_timestamp: Some(local_timestamp),
            timestamp: Some(end),
        }
        .to_message()?,
    );

    Ok(messages)
}
