pub mod overpass;
pub mod retry;

pub use overpass::{
    Element, HttpTransport, LatLon, Member, OverpassClient, OverpassError, OverpassResponse,
    OverpassTransport, Tags,
};
pub use retry::{RetryPolicy, with_retry};
