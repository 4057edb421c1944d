#![allow(dead_code)]

pub mod http;
pub mod netlens_env;
