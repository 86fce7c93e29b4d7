// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod assignment_test;
pub mod comment_test;
pub mod directory_test;
pub mod health_check;
pub mod helpers;
pub mod repositories;
pub mod time_log_test;
pub mod work_item_test;
