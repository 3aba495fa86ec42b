//! Types shared by the unit tests.

use alloc::string::String;

use pvm_reflect::derive::Reflect;
use pvm_reflect::ops::Variant;

pub trait Labelled {}

pub trait Located {}

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default, implements(Labelled, Located))]
pub struct Beacon {
    pub label: String,
    pub position: Option<Point>,
    pub enabled: bool,
}

impl Labelled for Beacon {}

impl Located for Beacon {}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
pub struct Base {
    pub serial: u32,
    pub note: Option<String>,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
pub struct Tagged {
    #[reflect(parent)]
    pub base: Base,
    pub tag: String,
    #[reflect(transient)]
    pub cache: u32,
}

#[derive(Reflect, Default)]
#[reflect(default)]
pub struct Slot {
    pub content: Variant,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default, type_id = "demo:Reading/1.0")]
pub struct Reading {
    pub channel: String,
    pub value: f64,
}

#[derive(Reflect, Debug, PartialEq)]
pub enum Mode {
    Idle,
    Running(u32),
}
