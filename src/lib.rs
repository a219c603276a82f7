// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

pub mod camera;
pub mod config;
pub mod error;
pub mod locator;
pub mod merge;
pub mod planner;
pub mod progress;
pub mod sink;
pub mod storage;
pub mod timekey;
