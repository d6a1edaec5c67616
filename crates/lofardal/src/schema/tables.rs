//! Attribute tables of the LOFAR common, beam-formed and TBB formats.

use lofardal_store::AttrType as T;

use super::DefaultValue::{Bool, Str, UInt32};
use super::NodeKind::{self, *};
use super::SchemaEntry;

const fn a(kind: NodeKind, name: &'static str, alias: &'static str, ty: T) -> SchemaEntry {
    SchemaEntry::new(kind, name, alias, ty)
}

pub static ENTRIES: &[SchemaEntry] = &[
    // -----------------------------------------------------------------------
    // Common LOFAR attributes (every file root)
    // -----------------------------------------------------------------------
    a(Root, "GROUPTYPE", "groupType", T::String).with_default(Str("Root")),
    a(Root, "FILENAME", "fileName", T::String),
    a(Root, "FILEDATE", "fileDate", T::String),
    a(Root, "FILETYPE", "fileType", T::String),
    a(Root, "TELESCOPE", "telescope", T::String).with_default(Str("LOFAR")),
    a(Root, "OBSERVER", "observer", T::String),
    a(Root, "PROJECT_ID", "projectID", T::String),
    a(Root, "PROJECT_TITLE", "projectTitle", T::String),
    a(Root, "PROJECT_PI", "projectPI", T::String),
    a(Root, "PROJECT_CO_I", "projectCOI", T::String),
    a(Root, "PROJECT_CONTACT", "projectContact", T::String),
    a(Root, "OBSERVATION_ID", "observationID", T::String),
    a(Root, "OBSERVATION_START_UTC", "observationStartUTC", T::String),
    a(Root, "OBSERVATION_START_MJD", "observationStartMJD", T::Float64),
    a(Root, "OBSERVATION_START_TAI", "observationStartTAI", T::String),
    a(Root, "OBSERVATION_END_UTC", "observationEndUTC", T::String),
    a(Root, "OBSERVATION_END_MJD", "observationEndMJD", T::Float64),
    a(Root, "OBSERVATION_END_TAI", "observationEndTAI", T::String),
    a(Root, "OBSERVATION_NOF_STATIONS", "observationNofStations", T::UInt32),
    a(Root, "OBSERVATION_STATIONS_LIST", "observationStationsList", T::StringArray),
    a(Root, "OBSERVATION_FREQUENCY_MAX", "observationFrequencyMax", T::Float64),
    a(Root, "OBSERVATION_FREQUENCY_MIN", "observationFrequencyMin", T::Float64),
    a(Root, "OBSERVATION_FREQUENCY_CENTER", "observationFrequencyCenter", T::Float64),
    a(Root, "OBSERVATION_FREQUENCY_UNIT", "observationFrequencyUnit", T::String)
        .with_default(Str("MHz")),
    a(Root, "OBSERVATION_NOF_BITS_PER_SAMPLE", "observationNofBitsPerSample", T::UInt32),
    a(Root, "CLOCK_FREQUENCY", "clockFrequency", T::Float64),
    a(Root, "CLOCK_FREQUENCY_UNIT", "clockFrequencyUnit", T::String).with_default(Str("MHz")),
    a(Root, "ANTENNA_SET", "antennaSet", T::String),
    a(Root, "FILTER_SELECTION", "filterSelection", T::String),
    a(Root, "TARGETS", "targets", T::StringArray),
    a(Root, "SYSTEM_VERSION", "systemVersion", T::String),
    a(Root, "PIPELINE_NAME", "pipelineName", T::String),
    a(Root, "PIPELINE_VERSION", "pipelineVersion", T::String),
    a(Root, "DOC_NAME", "docName", T::String),
    a(Root, "DOC_VERSION", "docVersion", T::String),
    a(Root, "NOTES", "notes", T::String),
    // -----------------------------------------------------------------------
    // Beam-formed file root
    // -----------------------------------------------------------------------
    a(BfRoot, "FILETYPE", "fileType", T::String).with_default(Str("bf")),
    a(BfRoot, "CREATE_OFFLINE_ONLINE", "createOfflineOnline", T::String),
    a(BfRoot, "BF_FORMAT", "BFFormat", T::String),
    a(BfRoot, "BF_VERSION", "BFVersion", T::String),
    a(BfRoot, "EXPTIME_START_UTC", "expTimeStartUTC", T::String),
    a(BfRoot, "EXPTIME_START_MJD", "expTimeStartMJD", T::Float64),
    a(BfRoot, "EXPTIME_START_TAI", "expTimeStartTAI", T::String),
    a(BfRoot, "EXPTIME_END_UTC", "expTimeEndUTC", T::String),
    a(BfRoot, "EXPTIME_END_MJD", "expTimeEndMJD", T::Float64),
    a(BfRoot, "EXPTIME_END_TAI", "expTimeEndTAI", T::String),
    a(BfRoot, "TOTAL_INTEGRATION_TIME", "totalIntegrationTime", T::Float64),
    a(BfRoot, "TOTAL_INTEGRATION_TIME_UNIT", "totalIntegrationTimeUnit", T::String)
        .with_default(Str("s")),
    a(BfRoot, "OBSERVATION_DATATYPE", "observationDataType", T::String),
    a(BfRoot, "SUB_ARRAY_POINTING_DIAMETER", "subArrayPointingDiameter", T::Float64),
    a(BfRoot, "SUB_ARRAY_POINTING_DIAMETER_UNIT", "subArrayPointingDiameterUnit", T::String)
        .with_default(Str("arcmin")),
    a(BfRoot, "BANDWIDTH", "bandwidth", T::Float64),
    a(BfRoot, "BANDWIDTH_UNIT", "bandwidthUnit", T::String).with_default(Str("MHz")),
    a(BfRoot, "BEAM_DIAMETER", "beamDiameter", T::Float64),
    a(BfRoot, "BEAM_DIAMETER_UNIT", "beamDiameterUnit", T::String).with_default(Str("arcmin")),
    a(BfRoot, "WEATHER_TEMPERATURE", "weatherTemperature", T::Float64Array),
    a(BfRoot, "WEATHER_TEMPERATURE_UNIT", "weatherTemperatureUnit", T::String)
        .with_default(Str("K")),
    a(BfRoot, "WEATHER_HUMIDITY", "weatherHumidity", T::Float64Array),
    a(BfRoot, "WEATHER_HUMIDITY_UNIT", "weatherHumidityUnit", T::String).with_default(Str("%")),
    a(BfRoot, "SYSTEM_TEMPERATURE", "systemTemperature", T::Float64Array),
    a(BfRoot, "SYSTEM_TEMPERATURE_UNIT", "systemTemperatureUnit", T::String)
        .with_default(Str("K")),
    a(BfRoot, "OBSERVATION_NOF_SUB_ARRAY_POINTINGS", "observationNofSubArrayPointings", T::UInt32),
    a(BfRoot, "NOF_SUB_ARRAY_POINTINGS", "nofSubArrayPointings", T::UInt32),
    a(SysLog, "GROUPTYPE", "groupType", T::String).with_default(Str("SysLog")),
    // -----------------------------------------------------------------------
    // Sub-array pointing
    // -----------------------------------------------------------------------
    a(SubArrayPointing, "GROUPTYPE", "groupType", T::String)
        .with_default(Str("SubArrayPointing")),
    a(SubArrayPointing, "TARGET", "target", T::String),
    a(SubArrayPointing, "EXPTIME_START_UTC", "expTimeStartUTC", T::String),
    a(SubArrayPointing, "EXPTIME_START_MJD", "expTimeStartMJD", T::Float64),
    a(SubArrayPointing, "EXPTIME_START_TAI", "expTimeStartTAI", T::String),
    a(SubArrayPointing, "EXPTIME_END_UTC", "expTimeEndUTC", T::String),
    a(SubArrayPointing, "EXPTIME_END_MJD", "expTimeEndMJD", T::Float64),
    a(SubArrayPointing, "EXPTIME_END_TAI", "expTimeEndTAI", T::String),
    a(SubArrayPointing, "POINT_RA", "pointRA", T::Float64),
    a(SubArrayPointing, "POINT_RA_UNIT", "pointRAUnit", T::String).with_default(Str("deg")),
    a(SubArrayPointing, "POINT_DEC", "pointDEC", T::Float64),
    a(SubArrayPointing, "POINT_DEC_UNIT", "pointDECUnit", T::String).with_default(Str("deg")),
    a(SubArrayPointing, "SUBBAND_WIDTH", "subbandWidth", T::Float64),
    a(SubArrayPointing, "SUBBAND_WIDTH_UNIT", "subbandWidthUnit", T::String)
        .with_default(Str("MHz")),
    a(SubArrayPointing, "OBSERVATION_NOF_BEAMS", "observationNofBeams", T::UInt32),
    a(SubArrayPointing, "NOF_BEAMS", "nofBeams", T::UInt32),
    a(SubArrayPointing, "NOF_STATIONS", "nofStations", T::UInt32),
    a(SubArrayPointing, "STATIONS_LIST", "stationsList", T::StringArray),
    a(SubArrayPointing, "CLOCK_RATE", "clockRate", T::Float64),
    a(SubArrayPointing, "CLOCK_RATE_UNIT", "clockRateUnit", T::String).with_default(Str("MHz")),
    a(SubArrayPointing, "NOF_SAMPLES", "nofSamples", T::UInt32),
    a(SubArrayPointing, "SAMPLING_RATE", "samplingRate", T::Float64),
    a(SubArrayPointing, "SAMPLING_RATE_UNIT", "samplingRateUnit", T::String)
        .with_default(Str("MHz")),
    a(SubArrayPointing, "SAMPLING_TIME", "samplingTime", T::Float64),
    a(SubArrayPointing, "SAMPLING_TIME_UNIT", "samplingTimeUnit", T::String)
        .with_default(Str("s")),
    a(SubArrayPointing, "CHANNELS_PER_SUBBAND", "channelsPerSubband", T::UInt32),
    a(SubArrayPointing, "CHANNEL_WIDTH", "channelWidth", T::Float64),
    a(SubArrayPointing, "CHANNEL_WIDTH_UNIT", "channelWidthUnit", T::String)
        .with_default(Str("MHz")),
    a(ProcessHistory, "GROUPTYPE", "groupType", T::String).with_default(Str("ProcessHistory")),
    a(ProcessHistory, "OBSERVATION_PARSET", "observationParset", T::String),
    a(ProcessHistory, "OBSERVATION_LOG", "observationLog", T::String),
    a(ProcessHistory, "PRESTO_PARSET", "prestoParset", T::String),
    a(ProcessHistory, "PRESTO_LOG", "prestoLog", T::String),
    // -----------------------------------------------------------------------
    // Beam
    // -----------------------------------------------------------------------
    a(Beam, "GROUPTYPE", "groupType", T::String).with_default(Str("Beam")),
    a(Beam, "TARGET", "target", T::String),
    a(Beam, "NOF_STATIONS", "nofStations", T::UInt32),
    a(Beam, "STATIONS_LIST", "stationsList", T::StringArray),
    a(Beam, "NOF_SAMPLES", "nofSamples", T::UInt32),
    a(Beam, "SAMPLING_RATE", "samplingRate", T::Float64),
    a(Beam, "SAMPLING_RATE_UNIT", "samplingRateUnit", T::String).with_default(Str("MHz")),
    a(Beam, "SAMPLING_TIME", "samplingTime", T::Float64),
    a(Beam, "SAMPLING_TIME_UNIT", "samplingTimeUnit", T::String).with_default(Str("s")),
    a(Beam, "CHANNELS_PER_SUBBAND", "channelsPerSubband", T::UInt32),
    a(Beam, "CHANNEL_WIDTH", "channelWidth", T::Float64),
    a(Beam, "CHANNEL_WIDTH_UNIT", "channelWidthUnit", T::String).with_default(Str("MHz")),
    a(Beam, "POINT_RA", "pointRA", T::Float64),
    a(Beam, "POINT_RA_UNIT", "pointRAUnit", T::String).with_default(Str("deg")),
    a(Beam, "POINT_DEC", "pointDEC", T::Float64),
    a(Beam, "POINT_DEC_UNIT", "pointDECUnit", T::String).with_default(Str("deg")),
    a(Beam, "POINT_OFFSET_RA", "pointOffsetRA", T::Float64),
    a(Beam, "POINT_OFFSET_RA_UNIT", "pointOffsetRAUnit", T::String).with_default(Str("deg")),
    a(Beam, "POINT_OFFSET_DEC", "pointOffsetDEC", T::Float64),
    a(Beam, "POINT_OFFSET_DEC_UNIT", "pointOffsetDECUnit", T::String).with_default(Str("deg")),
    a(Beam, "BEAM_DIAMETER_RA", "beamDiameterRA", T::Float64),
    a(Beam, "BEAM_DIAMETER_RA_UNIT", "beamDiameterRAUnit", T::String)
        .with_default(Str("arcmin")),
    a(Beam, "BEAM_DIAMETER_DEC", "beamDiameterDEC", T::Float64),
    a(Beam, "BEAM_DIAMETER_DEC_UNIT", "beamDiameterDECUnit", T::String)
        .with_default(Str("arcmin")),
    a(Beam, "BEAM_FREQUENCY_CENTER", "beamFrequencyCenter", T::Float64),
    a(Beam, "BEAM_FREQUENCY_CENTER_UNIT", "beamFrequencyCenterUnit", T::String)
        .with_default(Str("MHz")),
    a(Beam, "FOLDED_DATA", "foldedData", T::Bool).with_default(Bool(false)),
    a(Beam, "FOLD_PERIOD", "foldPeriod", T::Float64),
    a(Beam, "FOLD_PERIOD_UNIT", "foldPeriodUnit", T::String).with_default(Str("s")),
    a(Beam, "DEDISPERSION", "dedispersion", T::String),
    a(Beam, "DEDISPERSION_MEASURE", "dedispersionMeasure", T::Float64),
    a(Beam, "DEDISPERSION_MEASURE_UNIT", "dedispersionMeasureUnit", T::String)
        .with_default(Str("pc/cm^3")),
    a(Beam, "BARYCENTERED", "barycentered", T::Bool).with_default(Bool(false)),
    a(Beam, "OBSERVATION_NOF_STOKES", "observationNofStokes", T::UInt32),
    a(Beam, "NOF_STOKES", "nofStokes", T::UInt32),
    a(Beam, "STOKES_COMPONENTS", "stokesComponents", T::StringArray).since(2, 4, 0),
    a(Beam, "COMPLEX_VOLTAGES", "complexVoltages", T::Bool)
        .with_default(Bool(false))
        .since(2, 4, 0),
    a(Beam, "SIGNAL_SUM", "signalSum", T::String).since(2, 4, 0),
    // -----------------------------------------------------------------------
    // Stokes dataset
    // -----------------------------------------------------------------------
    a(Stokes, "DATATYPE", "dataType", T::String).with_default(Str("float")),
    a(Stokes, "STOKES_COMPONENT", "stokesComponent", T::String),
    a(Stokes, "NOF_CHANNELS", "nofChannels", T::UInt32Array),
    a(Stokes, "NOF_SUBBANDS", "nofSubbands", T::UInt32),
    a(Stokes, "NOF_SAMPLES", "nofSamples", T::UInt32),
    // -----------------------------------------------------------------------
    // Coordinates
    // -----------------------------------------------------------------------
    a(Coordinates, "GROUPTYPE", "groupType", T::String).with_default(Str("Coordinates")),
    a(Coordinates, "REF_LOCATION_VALUE", "refLocationValue", T::Float64Array),
    a(Coordinates, "REF_LOCATION_UNIT", "refLocationUnit", T::StringArray),
    a(Coordinates, "REF_LOCATION_FRAME", "refLocationFrame", T::String)
        .with_default(Str("ITRF")),
    a(Coordinates, "REF_TIME_VALUE", "refTimeValue", T::Float64),
    a(Coordinates, "REF_TIME_UNIT", "refTimeUnit", T::String).with_default(Str("d")),
    a(Coordinates, "REF_TIME_FRAME", "refTimeFrame", T::String).with_default(Str("MJD")),
    a(Coordinates, "NOF_COORDINATES", "nofCoordinates", T::UInt32),
    a(Coordinates, "NOF_AXES", "nofAxes", T::UInt32),
    a(Coordinates, "COORDINATE_TYPES", "coordinateTypes", T::StringArray),
    a(Coordinate, "COORDINATE_TYPE", "coordinateType", T::String),
    a(Coordinate, "STORAGE_TYPE", "storageType", T::StringArray),
    a(Coordinate, "NOF_AXES", "nofAxes", T::UInt32),
    a(Coordinate, "AXIS_NAMES", "axisNames", T::StringArray),
    a(Coordinate, "AXIS_UNITS", "axisUnits", T::StringArray),
    a(NumericalCoordinate, "REFERENCE_VALUE", "referenceValue", T::Float64),
    a(NumericalCoordinate, "REFERENCE_PIXEL", "referencePixel", T::Float64),
    a(NumericalCoordinate, "INCREMENT", "increment", T::Float64),
    a(NumericalCoordinate, "PC", "pc", T::Float64),
    a(NumericalCoordinate, "AXIS_LENGTH", "axisLength", T::UInt32),
    a(NumericalCoordinate, "AXIS_VALUES_PIXEL", "axisValuesPixel", T::UInt32Array),
    a(NumericalCoordinate, "AXIS_VALUES_WORLD", "axisValuesWorld", T::Float64Array),
    a(DirectionCoordinate, "GROUPTYPE", "groupType", T::String)
        .with_default(Str("DirectionCoord")),
    a(DirectionCoordinate, "COORDINATE_TYPE", "coordinateType", T::String)
        .with_default(Str("Direction")),
    a(DirectionCoordinate, "REFERENCE_VALUE", "referenceValue", T::Float64Array),
    a(DirectionCoordinate, "REFERENCE_PIXEL", "referencePixel", T::Float64Array),
    a(DirectionCoordinate, "INCREMENT", "increment", T::Float64Array),
    a(DirectionCoordinate, "PC", "pc", T::Float64Array),
    a(DirectionCoordinate, "EQUINOX", "equinox", T::String).with_default(Str("J2000")),
    a(DirectionCoordinate, "RADEC_SYS", "radecSys", T::String).with_default(Str("ICRS")),
    a(DirectionCoordinate, "PROJECTION", "projection", T::String),
    a(DirectionCoordinate, "PROJECTION_PARAM", "projectionParam", T::Float64Array),
    a(DirectionCoordinate, "LONPOLE", "lonPole", T::Float64),
    a(DirectionCoordinate, "LATPOLE", "latPole", T::Float64),
    a(TimeCoordinate, "GROUPTYPE", "groupType", T::String).with_default(Str("TimeCoord")),
    a(TimeCoordinate, "COORDINATE_TYPE", "coordinateType", T::String).with_default(Str("Time")),
    a(TimeCoordinate, "REFERENCE_FRAME", "referenceFrame", T::String),
    a(SpectralCoordinate, "GROUPTYPE", "groupType", T::String)
        .with_default(Str("SpectralCoord")),
    a(SpectralCoordinate, "COORDINATE_TYPE", "coordinateType", T::String)
        .with_default(Str("Spectral")),
    a(SpectralCoordinate, "REFERENCE_FRAME", "referenceFrame", T::String),
    a(SpectralCoordinate, "REST_FREQUENCY", "restFrequency", T::Float64),
    a(SpectralCoordinate, "REST_FREQUENCY_UNIT", "restFrequencyUnit", T::String)
        .with_default(Str("MHz")),
    a(SpectralCoordinate, "REST_WAVELENGTH", "restWavelength", T::Float64),
    a(SpectralCoordinate, "REST_WAVELENGTH_UNIT", "restWavelengthUnit", T::String)
        .with_default(Str("m")),
    a(StringCoordinate, "AXIS_LENGTH", "axisLength", T::UInt32),
    a(StringCoordinate, "AXIS_VALUES_PIXEL", "axisValuesPixel", T::UInt32Array),
    a(StringCoordinate, "AXIS_VALUES_WORLD", "axisValuesWorld", T::StringArray),
    a(PolarizationCoordinate, "GROUPTYPE", "groupType", T::String)
        .with_default(Str("PolarizationCoord")),
    a(PolarizationCoordinate, "COORDINATE_TYPE", "coordinateType", T::String)
        .with_default(Str("Polarization")),
    // -----------------------------------------------------------------------
    // Transient buffer board file root
    // -----------------------------------------------------------------------
    a(TbbRoot, "FILETYPE", "fileType", T::String).with_default(Str("tbb")),
    a(TbbRoot, "OPERATING_MODE", "operatingMode", T::String),
    a(TbbRoot, "NOF_STATIONS", "nofStations", T::UInt32),
    a(Trigger, "GROUPTYPE", "groupType", T::String).with_default(Str("TriggerGroup")),
    a(Trigger, "TRIGGER_TYPE", "triggerType", T::String),
    a(Trigger, "TRIGGER_VERSION", "triggerVersion", T::Int32),
    a(Trigger, "PARAM_COINCIDENCE_CHANNELS", "paramCoincidenceChannels", T::Int32),
    a(Trigger, "PARAM_COINCIDENCE_TIME", "paramCoincidenceTime", T::Float64),
    a(Trigger, "PARAM_DIRECTION_FIT", "paramDirectionFit", T::String),
    a(Trigger, "PARAM_ELEVATION_MIN", "paramElevationMin", T::Float64),
    a(Trigger, "PARAM_FIT_VARIANCE_MAX", "paramFitVarianceMax", T::Float64),
    // -----------------------------------------------------------------------
    // Station
    // -----------------------------------------------------------------------
    a(Station, "GROUPTYPE", "groupType", T::String).with_default(Str("StationGroup")),
    a(Station, "STATION_NAME", "stationName", T::String),
    a(Station, "STATION_POSITION", "stationPosition", T::Float64Array),
    a(Station, "STATION_POSITION_UNIT", "stationPositionUnit", T::String).with_default(Str("m")),
    a(Station, "STATION_POSITION_FRAME", "stationPositionFrame", T::String)
        .with_default(Str("ITRF")),
    a(Station, "BEAM_DIRECTION", "beamDirection", T::Float64Array),
    a(Station, "BEAM_DIRECTION_UNIT", "beamDirectionUnit", T::String).with_default(Str("deg")),
    a(Station, "BEAM_DIRECTION_FRAME", "beamDirectionFrame", T::String)
        .with_default(Str("AZEL")),
    a(Station, "CLOCK_OFFSET", "clockOffset", T::Float64),
    a(Station, "CLOCK_OFFSET_UNIT", "clockOffsetUnit", T::String).with_default(Str("s")),
    a(Station, "NOF_DIPOLES", "nofDipoles", T::UInt32),
    // -----------------------------------------------------------------------
    // Dipole dataset
    // -----------------------------------------------------------------------
    a(Dipole, "STATION_ID", "stationID", T::UInt32),
    a(Dipole, "RSP_ID", "rspID", T::UInt32),
    a(Dipole, "RCU_ID", "rcuID", T::UInt32),
    a(Dipole, "SAMPLE_FREQUENCY", "sampleFrequency", T::Float64),
    a(Dipole, "SAMPLE_FREQUENCY_UNIT", "sampleFrequencyUnit", T::String)
        .with_default(Str("MHz")),
    a(Dipole, "TIME", "time", T::UInt32),
    a(Dipole, "SAMPLE_NUMBER", "sampleNumber", T::UInt32),
    a(Dipole, "SAMPLES_PER_FRAME", "samplesPerFrame", T::UInt32).with_default(UInt32(1024)),
    a(Dipole, "DATA_LENGTH", "dataLength", T::UInt64),
    a(Dipole, "FLAG_OFFSETS", "flagOffsets", T::RangeArray).since(2, 5, 0),
    a(Dipole, "NYQUIST_ZONE", "nyquistZone", T::UInt32),
    a(Dipole, "CABLE_DELAY", "cableDelay", T::Float64),
    a(Dipole, "CABLE_DELAY_UNIT", "cableDelayUnit", T::String).with_default(Str("s")),
    a(Dipole, "DIPOLE_CALIBRATION_DELAY", "dipoleCalibrationDelay", T::Float64),
    a(Dipole, "DIPOLE_CALIBRATION_DELAY_UNIT", "dipoleCalibrationDelayUnit", T::String)
        .with_default(Str("s")),
    a(Dipole, "DIPOLE_CALIBRATION_DELAY_GAIN_CURVE", "dipoleCalibrationGainCurve", T::Complex64Array)
        .since(2, 5, 0),
    a(Dipole, "ANTENNA_POSITION", "antennaPosition", T::Float64Array),
    a(Dipole, "ANTENNA_POSITION_UNIT", "antennaPositionUnit", T::String).with_default(Str("m")),
    a(Dipole, "ANTENNA_POSITION_FRAME", "antennaPositionFrame", T::String)
        .with_default(Str("ITRF")),
    a(Dipole, "ANTENNA_NORMAL_VECTOR", "antennaNormalVector", T::Float64Array),
    a(Dipole, "ANTENNA_ROTATION_MATRIX", "antennaRotationMatrix", T::Float64Array),
    a(Dipole, "TILE_BEAM", "tileBeam", T::Float64Array).since(2, 5, 0),
    a(Dipole, "TILE_BEAM_UNIT", "tileBeamUnit", T::String)
        .with_default(Str("deg"))
        .since(2, 5, 0),
    a(Dipole, "TILE_BEAM_FRAME", "tileBeamFrame", T::String)
        .with_default(Str("AZEL"))
        .since(2, 5, 0),
    a(Dipole, "DISPERSION_MEASURE", "dispersionMeasure", T::Float64).since(2, 5, 0),
    a(Dipole, "DISPERSION_MEASURE_UNIT", "dispersionMeasureUnit", T::String)
        .with_default(Str("pc/cm^3"))
        .since(2, 5, 0),
];
