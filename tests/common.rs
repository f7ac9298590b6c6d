#![cfg(feature = "std")]

mod support;

use std::{io::Cursor, path::Path};

use chainring::{
    message::Message,
    profile::{MessageType, activity, device_info, event, file_id, lap, record, types},
};
use csv::ReaderBuilder;

const START: u32 = 1_000_000_000;

#[test]
fn encode_vec_short_activity() {
    const PATH: &str = "fixtures/short-activity.fit";
    let data = chainring::avec::encode_vec(&short_activity()).unwrap();
    Validator::new(PATH).validate(&data);
}

#[test]
fn encode_writer_short_activity() {
    const PATH: &str = "fixtures/short-activity.fit";
    let cursor = Cursor::new(Vec::<u8>::new());
    let cursor = chainring::avec::encode_writer(cursor, &short_activity()).unwrap();
    Validator::new(PATH).validate(cursor.get_ref());
}

#[test]
fn encode_writer_file() {
    let path = std::env::temp_dir().join(format!("chainring-{}.fit", std::process::id()));

    let file = std::fs::File::create(&path).unwrap();
    chainring::avec::encode_writer(file, &short_activity()).unwrap();

    let data = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    Validator::new("fixtures/short-activity.fit").validate(&data);
}

fn short_activity() -> Vec<Message> {
    let mut messages = Vec::new();

    let mut m = Message::new(MessageType::FileId);
    m.set_field(file_id::TYPE, types::FILE_ACTIVITY).unwrap();
    m.set_field(file_id::MANUFACTURER, types::MANUFACTURER_DEVELOPMENT).unwrap();
    m.set_field(file_id::PRODUCT, 0u16).unwrap();
    m.set_field(file_id::SERIAL_NUMBER, 1234u32).unwrap();
    m.set_field(file_id::TIME_CREATED, START).unwrap();
    messages.push(m);

    let mut m = Message::new(MessageType::DeviceInfo);
    m.set_field(device_info::DEVICE_INDEX, types::DEVICE_INDEX_CREATOR).unwrap();
    m.set_field(device_info::MANUFACTURER, types::MANUFACTURER_DEVELOPMENT).unwrap();
    m.set_field(device_info::PRODUCT, 0u16).unwrap();
    m.set_field(device_info::SOFTWARE_VERSION, 100u16).unwrap();
    m.set_field(device_info::PRODUCT_NAME, "FIT Cookbook").unwrap();
    m.set_field(device_info::TIMESTAMP, START).unwrap();
    messages.push(m);

    let mut m = Message::new(MessageType::Event);
    m.set_field(event::EVENT, types::EVENT_TIMER).unwrap();
    m.set_field(event::EVENT_TYPE, types::EVENT_TYPE_START).unwrap();
    m.set_field(event::TIMESTAMP, START).unwrap();
    messages.push(m);

    for i in 0..3 {
        let mut m = Message::new(MessageType::Record);
        m.set_field(record::HEART_RATE, 120 + i as u8).unwrap();
        m.set_field(record::TIMESTAMP, START + i).unwrap();
        messages.push(m);
    }

    let mut m = Message::new(MessageType::Event);
    m.set_field(event::EVENT, types::EVENT_TIMER).unwrap();
    m.set_field(event::EVENT_TYPE, types::EVENT_TYPE_STOP_ALL).unwrap();
    m.set_field(event::TIMESTAMP, START + 2).unwrap();
    messages.push(m);

    let mut m = Message::new(MessageType::Lap);
    m.set_field(lap::START_TIME, START).unwrap();
    m.set_field(lap::TOTAL_ELAPSED_TIME, 2000u32).unwrap();
    m.set_field(lap::TOTAL_TIMER_TIME, 2000u32).unwrap();
    m.set_field(lap::TIMESTAMP, START + 2).unwrap();
    m.set_field(lap::MESSAGE_INDEX, 0u16).unwrap();
    messages.push(m);

    let mut m = Message::new(MessageType::Activity);
    m.set_field(activity::TOTAL_TIMER_TIME, 2000u32).unwrap();
    m.set_field(activity::NUM_SESSIONS, 1u16).unwrap();
    m.set_field(activity::TYPE, 0u8).unwrap();
    m.set_field(activity::TIMESTAMP, START + 2).unwrap();
    messages.push(m);

    messages
}

struct Validator(Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let expected: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self(expected)
    }

    fn validate(self, data: &[u8]) {
        let document = support::decode(data);

        let found: Vec<Vec<String>> = document
            .data
            .iter()
            .map(|d| {
                let mut row = vec![d.global.to_string()];
                for (number, base_type, raw) in &d.fields {
                    row.push(number.to_string());
                    row.push(support::render(&support::decode_value(*base_type, raw)));
                }
                row
            })
            .collect();

        assert_eq!(found, self.0);
    }
}
