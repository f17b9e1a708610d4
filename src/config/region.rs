use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown region '{0}'")]
pub struct UnknownRegion(pub String);

/// Platform regions and the host each one is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    UsEast1,
    UsEast2,
    UsWest2,
    CaCentral1,
    SaEast1,
    EuWest1,
    EuWest2,
    EuCentral1,
    EuCentral2,
    MeCentral1,
    AfSouth1,
    ApSouth1,
    ApSoutheast2,
    ApNortheast1,
    ApNortheast2,
    ApNortheast3,
}

impl Region {
    pub const ALL: [Region; 16] = [
        Region::UsEast1,
        Region::UsEast2,
        Region::UsWest2,
        Region::CaCentral1,
        Region::SaEast1,
        Region::EuWest1,
        Region::EuWest2,
        Region::EuCentral1,
        Region::EuCentral2,
        Region::MeCentral1,
        Region::AfSouth1,
        Region::ApSouth1,
        Region::ApSoutheast2,
        Region::ApNortheast1,
        Region::ApNortheast2,
        Region::ApNortheast3,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Region::UsEast1 => "us_east_1",
            Region::UsEast2 => "us_east_2",
            Region::UsWest2 => "us_west_2",
            Region::CaCentral1 => "ca_central_1",
            Region::SaEast1 => "sa_east_1",
            Region::EuWest1 => "eu_west_1",
            Region::EuWest2 => "eu_west_2",
            Region::EuCentral1 => "eu_central_1",
            Region::EuCentral2 => "eu_central_2",
            Region::MeCentral1 => "me_central_1",
            Region::AfSouth1 => "af_south_1",
            Region::ApSouth1 => "ap_south_1",
            Region::ApSoutheast2 => "ap_southeast_2",
            Region::ApNortheast1 => "ap_northeast_1",
            Region::ApNortheast2 => "ap_northeast_2",
            Region::ApNortheast3 => "ap_northeast_3",
        }
    }

    /// Base host; the login and API hosts are `login.<host>` and `api.<host>`.
    pub fn host(self) -> &'static str {
        match self {
            Region::UsEast1 => "mypurecloud.com",
            Region::UsEast2 => "use2.us-gov-pure.cloud",
            Region::UsWest2 => "usw2.pure.cloud",
            Region::CaCentral1 => "cac1.pure.cloud",
            Region::SaEast1 => "sae1.pure.cloud",
            Region::EuWest1 => "mypurecloud.ie",
            Region::EuWest2 => "euw2.pure.cloud",
            Region::EuCentral1 => "mypurecloud.de",
            Region::EuCentral2 => "euc2.pure.cloud",
            Region::MeCentral1 => "mec1.pure.cloud",
            Region::AfSouth1 => "afs1.pure.cloud",
            Region::ApSouth1 => "aps1.pure.cloud",
            Region::ApSoutheast2 => "mypurecloud.com.au",
            Region::ApNortheast1 => "mypurecloud.jp",
            Region::ApNortheast2 => "apne2.pure.cloud",
            Region::ApNortheast3 => "apne3.pure.cloud",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    // Exact match only: region ids are case sensitive on the platform side too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.id() == s)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_ids_round_trip() {
        for region in Region::ALL {
            assert_eq!(region.id().parse::<Region>(), Ok(region));
        }
    }

    #[test]
    fn test_region_rejects_unknown_and_mis_cased() {
        assert_eq!(
            "mars_north_1".parse::<Region>(),
            Err(UnknownRegion("mars_north_1".to_string()))
        );
        assert!("US_EAST_1".parse::<Region>().is_err());
        assert!(" us_east_1".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_hosts() {
        assert_eq!(Region::UsEast1.host(), "mypurecloud.com");
        assert_eq!(Region::EuWest1.host(), "mypurecloud.ie");
        assert_eq!(Region::UsWest2.to_string(), "us_west_2");
    }
}
