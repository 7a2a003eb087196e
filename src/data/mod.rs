/// Data layer: schema descriptor, core types, loading, and the wordlist view.
///
/// Architecture:
/// ```text
///  descriptor.json        varieties.csv / concepts.csv / lexemes.csv
///        │                                │
///        ▼                                ▼
///   ┌──────────┐                    ┌──────────┐
///   │  schema   │── column types ──▶│  loader   │  coerce cells, check keys
///   └──────────┘                    └──────────┘
///                                         │
///                                         ▼
///                                   ┌──────────┐
///                                   │  Dataset  │  typed tables, key index
///                                   └──────────┘
///                                      │      │
///                                      ▼      ▼
///                              ┌──────────┐ ┌──────────┐
///                              │ wordlist  │ │  writer   │
///                              └──────────┘ └──────────┘
/// ```
pub mod loader;
pub mod model;
pub mod schema;
pub mod wordlist;
pub mod writer;
