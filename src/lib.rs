//! An ordered multiset of key-value entries, stored in a skip list.
//!
//! A skip list keeps its entries in a sorted linked list, and speeds up
//! searches by stacking sparser "express" lists on top of it:
//!
//! ```text
//! <head>-----[2]-------------------------[9]------<tail>
//! <head>-----[2]-----------------[7]-----[9]------<tail>
//! <head>-----[2]-----[4]---------[7]-----[9]-[10]-<tail>
//! <head>-[1]-[2]-[3]-[4]-[5]-[6]-[7]-[8]-[9]-[10]-<tail>
//! ```
//!
//! Each entry forms a tower whose height is drawn at random when it is
//! inserted, so that searching, inserting and removing all take `O(log(n))`
//! steps on average.
//!
//! The [`SkipList`] in this crate is a multiset: [`put`][SkipList::put] never
//! overwrites, several entries may share a key, [`remove`][SkipList::remove]
//! drops all of them, and [`get_range`][SkipList::get_range] yields every
//! entry in an inclusive key range. [`replace`][SkipList::replace] gives the
//! map-like "insert or overwrite" behaviour instead.
//!
//! # Ordering
//!
//! Keys only need [`PartialOrd`], and the list relies on that ordering being
//! consistent: two keys are the same key when neither is less than the other,
//! and comparisons must be transitive. A key which is not even comparable with
//! itself (a float `NaN`) is rejected with [`Error::UnorderableKey`]. An
//! inconsistent ordering cannot cause memory unsafety, but it will return
//! unexpected results.
//!
//! # Examples
//!
//! ```
//! use skipdict::SkipList;
//!
//! let mut list = SkipList::new();
//! list.put("banana", 3);
//! list.put("apple", 1);
//! list.put("banana", 5);
//!
//! assert_eq!(list.len(), 3);
//! assert_eq!(list.get(&"apple"), Some(&1));
//! assert_eq!(list.get_range(&"b", &"c").count(), 2);
//! assert_eq!(list.remove(&"banana"), 2);
//! ```

mod arena;
pub mod dictionary;
mod error;
pub mod level_generator;
mod skiplist;
mod skipnode;

pub use crate::{
    dictionary::Dictionary,
    error::Error,
    level_generator::{Geometric, LevelGenerator},
    skiplist::{Iter, Range, SkipList},
};
