pub mod compression;
pub mod null_bitmap;

pub use null_bitmap::NullBitmap;

#[cfg(test)]
mod null_bitmap_test;
