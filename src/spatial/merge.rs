//! Joining of line fragments that share endpoints.

use geo::{Coord, LineString};
use hashbrown::HashMap;

type EndpointKey = (u64, u64);

fn endpoint_key(c: &Coord<f64>) -> EndpointKey {
    // +0.0 folds -0.0 into 0.0
    ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
}

fn is_closed(line: &[Coord<f64>]) -> bool {
    match (line.first(), line.last()) {
        (Some(a), Some(b)) => endpoint_key(a) == endpoint_key(b),
        _ => false,
    }
}

/// Fragments touching each endpoint, by part index. Closed parts are left out.
struct Endpoints {
    parts: HashMap<EndpointKey, Vec<usize>>,
}

impl Endpoints {
    fn new(parts: &[Vec<Coord<f64>>]) -> Self {
        let mut index: HashMap<EndpointKey, Vec<usize>> = HashMap::new();
        for (i, part) in parts.iter().enumerate() {
            if is_closed(part) {
                continue;
            }
            for c in [part.first(), part.last()].into_iter().flatten() {
                index.entry(endpoint_key(c)).or_default().push(i);
            }
        }
        Self { parts: index }
    }

    fn unused_at(&self, key: &EndpointKey, used: &[bool]) -> Option<usize> {
        self.parts.get(key)?.iter().copied().find(|&i| !used[i])
    }
}

/// Append unused fragments at the end of `line` until it closes or no
/// fragment touches its last coordinate.
fn extend_end(
    line: &mut Vec<Coord<f64>>,
    parts: &mut [Vec<Coord<f64>>],
    used: &mut [bool],
    endpoints: &Endpoints,
) {
    while !is_closed(line) {
        let Some(key) = line.last().map(endpoint_key) else {
            break;
        };
        let Some(next) = endpoints.unused_at(&key, used) else {
            break;
        };
        used[next] = true;

        let mut part = std::mem::take(&mut parts[next]);
        if part.first().map(endpoint_key) != Some(key) {
            part.reverse();
        }
        line.extend(part.into_iter().skip(1));
    }
}

/// Merge line fragments end-to-end into as few lines as possible.
///
/// Fragments are joined whenever an endpoint of one equals an endpoint of
/// another, reversing fragments as needed. Closed fragments are kept as they
/// are. Fragments with fewer than two coordinates are dropped.
pub fn merge_line_parts(parts: Vec<Vec<Coord<f64>>>) -> Vec<LineString<f64>> {
    let mut parts: Vec<Vec<Coord<f64>>> = parts.into_iter().filter(|p| p.len() >= 2).collect();
    let endpoints = Endpoints::new(&parts);
    let mut used = vec![false; parts.len()];
    let mut result = Vec::new();

    for i in 0..parts.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let mut line = std::mem::take(&mut parts[i]);
        // Grow forward, then grow the reversed line to extend the start
        extend_end(&mut line, &mut parts, &mut used, &endpoints);
        line.reverse();
        extend_end(&mut line, &mut parts, &mut used, &endpoints);
        line.reverse();

        result.push(LineString::new(line));
    }

    result
}
