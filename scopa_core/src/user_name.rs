use renet::transport::NETCODE_USER_DATA_BYTES;

const LENGTH_PREFIX: usize = 8;

/// Participant name carried in the netcode user data of a connection:
/// an 8 byte little-endian length followed by UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn from_string(name: String) -> Self {
        let max = NETCODE_USER_DATA_BYTES - LENGTH_PREFIX;
        let mut name = name.trim().to_string();
        while name.len() > max {
            name.pop();
        }
        Username(name)
    }

    pub fn to_str(&self) -> String {
        self.0.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_netcode_user_data(&self) -> [u8; NETCODE_USER_DATA_BYTES] {
        let mut user_data = [0u8; NETCODE_USER_DATA_BYTES];
        let bytes = self.0.as_bytes();
        user_data[0..LENGTH_PREFIX].copy_from_slice(&(bytes.len() as u64).to_le_bytes());
        user_data[LENGTH_PREFIX..LENGTH_PREFIX + bytes.len()].copy_from_slice(bytes);
        user_data
    }

    pub fn from_user_data(user_data: &[u8; NETCODE_USER_DATA_BYTES]) -> Self {
        let mut prefix = [0u8; LENGTH_PREFIX];
        prefix.copy_from_slice(&user_data[0..LENGTH_PREFIX]);
        let len =
            (u64::from_le_bytes(prefix) as usize).min(NETCODE_USER_DATA_BYTES - LENGTH_PREFIX);
        let name = String::from_utf8_lossy(&user_data[LENGTH_PREFIX..LENGTH_PREFIX + len]);
        Username::from_string(name.into_owned())
    }
}
