//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use netcdf::AttributeValue;
use std::path::Path;

pub const RAIN: [f32; 6] = [0.0, 0.5, -999.0, 1.25, 2.0, 4.0];

/// A small netCDF-4 file: coordinates, a float data variable with a fill
/// value and an integer mask.
pub fn write_netcdf4(path: &Path, conventions: Option<&str>) {
    let mut file = netcdf::create(path).expect("Failed to create NetCDF file");
    fill_rain_file(&mut file, conventions);
}

/// Same content as [`write_netcdf4`], stored as netCDF-4 with the classic
/// data model.
pub fn write_netcdf4_classic(path: &Path, conventions: Option<&str>) {
    let mut file = netcdf::create_with(path, netcdf::Options::NETCDF4 | netcdf::Options::CLASSIC)
        .expect("Failed to create NetCDF file");
    fill_rain_file(&mut file, conventions);
}

fn fill_rain_file(file: &mut netcdf::FileMut, conventions: Option<&str>) {
    file.add_dimension("lat", 2).expect("Failed to add dimension lat");
    file.add_dimension("lon", 3).expect("Failed to add dimension lon");
    file.add_attribute("title", "wgrib2 test output")
        .expect("Failed to add title");
    if let Some(c) = conventions {
        file.add_attribute("Conventions", c)
            .expect("Failed to add Conventions");
    }

    {
        let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
        lat.put_attribute("units", "degrees_north").unwrap();
        lat.put_values(&[50.0, 51.0], ..).unwrap();
    }
    {
        let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
        lon.put_attribute("units", "degrees_east").unwrap();
        lon.put_values(&[4.0, 5.0, 6.0], ..).unwrap();
    }
    {
        let mut rain = file.add_variable::<f32>("rain", &["lat", "lon"]).unwrap();
        rain.put_attribute("_FillValue", -999.0f32).unwrap();
        rain.put_attribute("units", "kg m-2 s-1").unwrap();
        rain.put_values(&RAIN, ..).unwrap();
    }
    {
        let mut mask = file.add_variable::<i32>("mask", &["lat", "lon"]).unwrap();
        mask.put_values(&[1, 1, 0, 0, 1, 1], ..).unwrap();
    }
}

/// A hand-assembled CDF-1 file with a dimension `x` of length 3, the given
/// global text attributes and one float variable `rain(x)` in `mm`.
pub fn classic_bytes(global_attrs: &[(&str, &str)]) -> Vec<u8> {
    const NC_DIMENSION: u32 = 0x0A;
    const NC_VARIABLE: u32 = 0x0B;
    const NC_ATTRIBUTE: u32 = 0x0C;
    const NC_CHAR: u32 = 2;
    const NC_FLOAT: u32 = 5;

    let mut buf = b"CDF\x01".to_vec();
    put_u32(&mut buf, 0); // numrecs

    put_u32(&mut buf, NC_DIMENSION);
    put_u32(&mut buf, 1);
    put_name(&mut buf, "x");
    put_u32(&mut buf, 3);

    put_text_attrs(&mut buf, global_attrs, NC_ATTRIBUTE, NC_CHAR);

    put_u32(&mut buf, NC_VARIABLE);
    put_u32(&mut buf, 1);
    put_name(&mut buf, "rain");
    put_u32(&mut buf, 1); // rank
    put_u32(&mut buf, 0); // dimid of x
    put_text_attrs(&mut buf, &[("units", "mm")], NC_ATTRIBUTE, NC_CHAR);
    put_u32(&mut buf, NC_FLOAT);
    put_u32(&mut buf, 12); // vsize
    let begin = buf.len() as u32 + 4;
    put_u32(&mut buf, begin);

    for v in [1.0f32, 2.0, 3.0] {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    buf
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn pad(buf: &mut Vec<u8>) {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

fn put_name(buf: &mut Vec<u8>, name: &str) {
    put_u32(buf, name.len() as u32);
    buf.extend_from_slice(name.as_bytes());
    pad(buf);
}

fn put_text_attrs(buf: &mut Vec<u8>, attrs: &[(&str, &str)], tag: u32, nc_char: u32) {
    if attrs.is_empty() {
        put_u32(buf, 0);
        put_u32(buf, 0);
        return;
    }
    put_u32(buf, tag);
    put_u32(buf, attrs.len() as u32);
    for (name, value) in attrs {
        put_name(buf, name);
        put_u32(buf, nc_char);
        put_u32(buf, value.len() as u32);
        buf.extend_from_slice(value.as_bytes());
        pad(buf);
    }
}

/// Read a global string attribute.
pub fn global_str(path: &Path, name: &str) -> Option<String> {
    let file = netcdf::open(path).expect("Failed to open NetCDF file");
    let attr = file.attribute(name)?;
    match attr.value().expect("Failed to read attribute") {
        AttributeValue::Str(s) => Some(s),
        other => panic!("attribute {} is not a string: {:?}", name, other),
    }
}

/// Read a string attribute of a variable.
pub fn var_str(path: &Path, var: &str, name: &str) -> Option<String> {
    let file = netcdf::open(path).expect("Failed to open NetCDF file");
    let var = file.variable(var).expect("Variable not found");
    let attr = var.attribute(name)?;
    match attr.value().expect("Failed to read attribute") {
        AttributeValue::Str(s) => Some(s),
        other => panic!("attribute {} is not a string: {:?}", name, other),
    }
}

/// Read all values of a float variable.
pub fn f32_values(path: &Path, var: &str) -> Vec<f32> {
    let file = netcdf::open(path).expect("Failed to open NetCDF file");
    let var = file.variable(var).expect("Variable not found");
    var.get_values::<f32, _>(..).expect("Failed to read values")
}

/// Read all values of an integer variable.
pub fn i32_values(path: &Path, var: &str) -> Vec<i32> {
    let file = netcdf::open(path).expect("Failed to open NetCDF file");
    let var = file.variable(var).expect("Variable not found");
    var.get_values::<i32, _>(..).expect("Failed to read values")
}
