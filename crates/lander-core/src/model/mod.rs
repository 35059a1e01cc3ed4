pub mod axis;
pub mod header;
pub mod landing;
pub mod section;
pub mod snapshot;
pub mod variant;

pub use axis::{AxisCatalog, AxisDefinition};
pub use header::{HeaderConfig, NavLink};
pub use landing::{
    Branding, DownloadApp, LandingConfigResponse, LandingSection, PricingOverview, PricingPlan,
    VariantSummary,
};
pub use section::{ContentSection, NewSection, PreparedSection, SectionInput, SectionType};
pub use snapshot::{SnapshotVariant, VariantSnapshot};
pub use variant::{NewVariant, Variant, VariantPatch, VariantStatus};
