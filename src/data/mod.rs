//! Data layer: ingestion, averaging and normalisation.
//!
//! Architecture:
//! ```text
//!  instrument dumps (*.txt)      sanitised_data.txt / builtin reference
//!        │                                 │
//!        ▼                                 ▼
//!   ┌──────────┐                      ┌──────────┐
//!   │  loader   │  sorted discovery   │  loader   │  `[a, b, ...]` lines
//!   │ + filter  │  header skip,       └──────────┘
//!   └──────────┘  [0, B], inversion        │
//!        │                                 │
//!        ▼                                 │
//!   ┌───────────┐                          │
//!   │ averaging  │  W-sample windows       │
//!   └───────────┘  → element-wise mean     │
//!        │                                 │
//!        ▼                                 ▼
//!   ┌─────────────────────────────────────────┐
//!   │ normalize   min-max rescale to [0, 1]    │
//!   └─────────────────────────────────────────┘
//!        │
//!        ▼
//!     ProfileSet → compare
//! ```

pub mod averaging;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod reference;
