#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use pvm_data as data;
pub use pvm_marshal as marshal;
pub use pvm_reflect as reflect;
pub use pvm_utils as utils;
