/*!
The World Magnetic Model (WMM): the main geomagnetic field produced by the
Earth's core, and its variation over time.

The model is a degree and order 12 spherical-harmonic expansion. For a
location and date it gives the field components X (north), Y (east) and Z
(down), the horizontal and total intensities H and F, the declination D, the
inclination I and the grid variation GV, together with their secular rates of
change and the model's published uncertainties.

```no_run
use wmm_rs::{CoefficientSet, Evaluator, Geodetic};

let evaluator = Evaluator::new(CoefficientSet::wmm2020()?);
let (field, advisories) = evaluator.compute_field(Geodetic::new(30.0, -88.51, 10.0), 2022.5)?;
for advisory in &advisories {
    eprintln!("Warning: {advisory}");
}
println!("Declination {:.2} ± {:.2} degrees", field.d(), field.err_d());
# Ok::<(), wmm_rs::WmmError>(())
```

Only the long-wavelength field of the core is modelled. Crustal anomalies and
magnetospheric/ionospheric disturbances are not, so local deviations of
several degrees are possible.
 */

pub mod coefficients;
pub mod config;
pub mod constants;
pub mod coord;
mod error;
pub mod evaluator;
pub mod field;
pub mod polynomial;
pub mod utils;

// Re-exports.
pub use coefficients::{CoefficientSet, GaussCoefficients};
pub use config::{EvaluatorConfig, UncertaintyModel};
pub use coord::{Geodetic, Spherical};
pub use error::{Advisory, WmmError};
pub use evaluator::{compute_field, Evaluator};
pub use field::{FieldComponents, MagneticField};
pub use utils::DecimalYear;
