// Copyright (c) the cooltools-rs contributors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Region-list parsing for `compute-expected --regions`.
//!
//! A region file is tab-separated `name, start, stop` rows (bin indices,
//! half-open). When no file is given, the whole store is treated as a
//! single region named `all`.

use std::ops::Range;
use std::path::Path;

use hic_dots::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub name: String,
    pub range: Range<usize>,
}

pub fn load_regions(path: Option<&Path>, store_len: usize) -> Result<Vec<Region>> {
    match path {
        None => Ok(vec![Region { name: "all".to_string(), range: 0..store_len }]),
        Some(path) => {
            let mut rdr = csv::ReaderBuilder::new().delimiter(b'\t').has_headers(false).from_path(path)?;
            let mut regions = Vec::new();
            for result in rdr.records() {
                let record = result?;
                if record.len() != 3 {
                    return Err(Error::ShapeMismatch(format!("region row {record:?} must have 3 columns")));
                }
                let name = record[0].to_string();
                let start: usize = record[1].parse().map_err(|_| Error::ShapeMismatch(format!("invalid region start {:?}", &record[1])))?;
                let stop: usize = record[2].parse().map_err(|_| Error::ShapeMismatch(format!("invalid region stop {:?}", &record[2])))?;
                regions.push(Region { name, range: start..stop });
            }
            Ok(regions)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_path_yields_one_whole_region() {
        let regions = load_regions(None, 100).unwrap();
        assert_eq!(regions, vec![Region { name: "all".to_string(), range: 0..100 }]);
    }
}
