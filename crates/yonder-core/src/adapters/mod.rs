mod esri;
mod gisgraphy;
mod nominatim;
mod opencage;

pub use esri::EsriAdapter;
pub use gisgraphy::GisgraphyAdapter;
pub use nominatim::NominatimAdapter;
pub use opencage::OpenCageAdapter;
