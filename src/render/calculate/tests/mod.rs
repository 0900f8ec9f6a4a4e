#![allow(unused_imports)] // for pretty_assertions::{assert_eq, assert_ne}

use crate::diagnostic::{AnnotationStyle, Severity};
use crate::file::SimpleFile;
use pretty_assertions::{assert_eq, assert_ne};
use super::*;
