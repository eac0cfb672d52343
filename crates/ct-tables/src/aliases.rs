//! Known column-name aliases, most common first.

pub const FLIGHT_NUMBER: &[&str] = &["FlightNumber"];
pub const DEPARTURE_AIRPORT: &[&str] = &["DepartureAirport"];
pub const ARRIVAL_AIRPORT: &[&str] = &["ArrivalAirport"];
pub const FLIGHT_DATE: &[&str] = &["FlightDate"];
pub const AIRCRAFT_TYPE: &[&str] = &["AircraftType"];
pub const AIRCRAFT_REGISTRATION: &[&str] = &["AircraftRegistration"];
pub const ZERO_FUEL_WEIGHT: &[&str] = &["ActualZeroFuelWeight"];
pub const MAC_ZFW: &[&str] = &["MacZFW"];
pub const TRIP_FUEL: &[&str] = &["TripFuel", "TripF"];

pub const PIECE_SERIAL: &[&str] = &["SerialNumber", "BookingAirWaybillNumber", "AirWaybillNumber"];
pub const PIECE_COUNT: &[&str] = &[
    "NumberOfPieces",
    "BookingSegmentPieceCount",
    "BookingTotalPieceCount",
];
pub const PIECE_WEIGHT: &[&str] = &[
    "Weight",
    "BookingLinePieceWeight",
    "BookingSegmentPiecesWeight",
    "BookingTotalWeight",
];
pub const PIECE_VOLUME: &[&str] = &[
    "Volume",
    "BookingLinePieceVolume",
    "BookingSegmentVolume",
    "BookingTotalVolume",
];
pub const PIECE_CRT: &[&str] = &["CRT", "IsCRT"];
pub const PIECE_COL: &[&str] = &["COL", "IsCOL"];
pub const PIECE_DANGEROUS: &[&str] = &["Dangerous", "IsDangerousGoods", "DangerousGoods"];
pub const PIECE_COMMODITY: &[&str] = &["Commodity", "BookingCommodityCode"];

pub const BUILDUP_ULD: &[&str] = &["ULD", "ULDSerialNumber", "DeadloadId"];
pub const BUILDUP_AWB: &[&str] = &["AirWaybillNumber"];
pub const BUILDUP_WEIGHT: &[&str] = &["Weight", "TotalWeightOnAWB", "TotalWeight", "WeightOnAWB"];

pub const LOCATION_SERIAL: &[&str] = &["SerialNumber", "ULDSerialNumber", "DeadloadId"];
pub const LOCATION_POSITION: &[&str] = &["LoadLocation", "Position", "Location"];
pub const LOCATION_WEIGHT: &[&str] = &["UldGrossWeight", "Weight", "TotalWeight"];
pub const LOCATION_DEADLOAD_TYPE: &[&str] = &["DeadloadType"];

pub const PAX_WEIGHT: &[&str] = &["TotalPaxWeight", "PaxWeight", "TotalWeight"];
pub const PAX_COUNT: &[&str] = &["TotalPax", "NumberOfPax", "PaxCount"];
